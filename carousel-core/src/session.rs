//! Editing session.
//!
//! Ties the deck, the editor and the selected aspect ratio together and turns
//! every rejected or failed action into a [`Notice`]. Surfaces drain the
//! notices after each action and show them however they like.

use crate::copy::{CopyGenerator, ProductBrief};
use crate::editor::SlideEditor;
use crate::media;
use crate::notice::Notice;
use crate::slide::{BackgroundType, ElementId, Slide, StickerElement};
use crate::{AspectRatio, CarouselError, CarouselResult, DeckDocument, SlideDeck, SlideId};

/// In-memory state of one carousel editing session.
#[derive(Debug, Clone, Default)]
pub struct CarouselSession {
    deck: SlideDeck,
    editor: SlideEditor,
    aspect_ratio: AspectRatio,
    product: Option<ProductBrief>,
    notices: Vec<Notice>,
}

impl CarouselSession {
    /// Start a session with one blank slide.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session from a deck document.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::EmptyDeck`] if the document has no slides.
    pub fn from_document(document: DeckDocument) -> CarouselResult<Self> {
        let aspect_ratio = document.aspect_ratio;
        Ok(Self {
            deck: document.into_deck()?,
            aspect_ratio,
            ..Self::default()
        })
    }

    /// Snapshot the session as a deck document.
    #[must_use]
    pub fn to_document(&self) -> DeckDocument {
        DeckDocument::from_deck(&self.deck, self.aspect_ratio)
    }

    /// The slide deck.
    #[must_use]
    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    /// The editor state.
    #[must_use]
    pub fn editor(&self) -> &SlideEditor {
        &self.editor
    }

    /// Mutable editor state (text input and selections).
    pub fn editor_mut(&mut self) -> &mut SlideEditor {
        &mut self.editor
    }

    /// The current slide.
    #[must_use]
    pub fn current_slide(&self) -> &Slide {
        self.deck.current_slide()
    }

    /// The selected aspect ratio.
    #[must_use]
    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    /// Change the aspect ratio. Slides are authored in a fixed space so
    /// nothing else changes.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        tracing::debug!(from = %self.aspect_ratio, to = %aspect_ratio, "Aspect ratio changed");
        self.aspect_ratio = aspect_ratio;
    }

    /// The product AI copy is written for.
    #[must_use]
    pub fn product(&self) -> Option<&ProductBrief> {
        self.product.as_ref()
    }

    /// Select (or clear) the product.
    pub fn select_product(&mut self, product: Option<ProductBrief>) {
        self.product = product;
    }

    /// Notices queued since the last drain.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take all queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Duplicate the current slide after itself and select the copy.
    pub fn add_slide(&mut self) -> SlideId {
        self.deck.add_slide()
    }

    /// Delete a slide. Deleting the only slide is rejected with a notice.
    ///
    /// # Errors
    ///
    /// Propagates [`SlideDeck::delete_slide`] errors.
    pub fn delete_slide(&mut self, index: usize) -> CarouselResult<Slide> {
        self.deck.delete_slide(index).inspect_err(|e| match e {
            CarouselError::CannotDeleteLastSlide => self
                .notices
                .push(Notice::error("Cannot delete", "You must have at least one slide")),
            other => self.reject(other),
        })
    }

    /// Select a slide.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::SlideIndexOutOfRange`] for a bad index.
    pub fn select_slide(&mut self, index: usize) -> CarouselResult<()> {
        self.deck
            .set_current_slide_index(index)
            .inspect_err(|e| self.reject(e))
    }

    /// Move to the next slide, if any.
    pub fn next_slide(&mut self) -> bool {
        self.deck.next_slide()
    }

    /// Move to the previous slide, if any.
    pub fn previous_slide(&mut self) -> bool {
        self.deck.previous_slide()
    }

    /// Change the current slide's background type.
    pub fn set_background_type(&mut self, background_type: BackgroundType) {
        let next = self
            .editor
            .set_background_type(self.deck.current_slide(), background_type);
        self.deck.update_current_slide(next);
    }

    /// Change the current slide's background colour.
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        let next = self
            .editor
            .set_background_color(self.deck.current_slide(), color);
        self.deck.update_current_slide(next);
    }

    /// Upload the current slide's background image.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::UnsupportedImage`] if `data` is not an image.
    pub fn upload_background_image(&mut self, data: &[u8]) -> CarouselResult<()> {
        let uri = media::data_uri_from_bytes(data).inspect_err(|e| self.reject(e))?;
        let next = self
            .editor
            .set_background_image(self.deck.current_slide(), uri);
        self.deck.update_current_slide(next);
        Ok(())
    }

    /// Upload the image for one grid cell of the current slide.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not an image, the slide has no grid
    /// background, or `index` is not a cell of it.
    pub fn upload_grid_image(&mut self, index: usize, data: &[u8]) -> CarouselResult<()> {
        let result = media::data_uri_from_bytes(data).and_then(|uri| {
            self.editor
                .set_grid_image(self.deck.current_slide(), index, uri)
        });
        let next = result.inspect_err(|e| self.reject(e))?;
        self.deck.update_current_slide(next);
        Ok(())
    }

    /// Add the editor's text input to the current slide.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::EmptyText`] for blank input.
    pub fn add_text(&mut self) -> CarouselResult<()> {
        let next = self
            .editor
            .add_text_element(self.deck.current_slide())
            .inspect_err(|e| self.reject(e))?;
        self.deck.update_current_slide(next);
        Ok(())
    }

    /// Remove a text element from the current slide.
    pub fn remove_text(&mut self, id: ElementId) {
        let next = self
            .editor
            .remove_text_element(self.deck.current_slide(), id);
        self.deck.update_current_slide(next);
    }

    /// Place a sticker on the current slide.
    pub fn add_sticker(&mut self, sticker: StickerElement) {
        let next = self.editor.add_sticker(self.deck.current_slide(), sticker);
        self.deck.update_current_slide(next);
    }

    /// Remove a sticker from the current slide.
    pub fn remove_sticker(&mut self, id: ElementId) {
        let next = self.editor.remove_sticker(self.deck.current_slide(), id);
        self.deck.update_current_slide(next);
    }

    /// Ask for an AI suggestion for the current slide.
    ///
    /// On success the text input holds the suggestion and a success notice
    /// is queued; on failure the input is unchanged and the error message
    /// becomes the notice.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::NoProductSelected`] or the generator's error.
    pub async fn generate_text(&mut self, generator: &dyn CopyGenerator) -> CarouselResult<()> {
        let result = self
            .editor
            .suggest_text(generator, self.product.as_ref(), self.deck.current_slide())
            .await;
        match result {
            Ok(()) => {
                self.notices.push(Notice::success("AI text generated!", ""));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Error generating text");
                self.notices.push(Notice::error(e.to_string(), ""));
                Err(e)
            }
        }
    }

    fn reject(&mut self, error: &CarouselError) {
        tracing::debug!(error = %error, "Action rejected");
        let title = match error {
            CarouselError::EmptyText => "Text is empty",
            CarouselError::UnsupportedImage(_) => "Upload failed",
            _ => "Action rejected",
        };
        self.notices.push(Notice::error(title, error.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copy::CopyRequest;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl CopyGenerator for Echo {
        async fn generate(&self, request: &CopyRequest) -> CarouselResult<String> {
            Ok(format!("{} slide {}", request.product.app_name, request.slide_number))
        }
    }

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_delete_last_slide_emits_notice() {
        let mut session = CarouselSession::new();
        let before = session.deck().clone();

        assert!(session.delete_slide(0).is_err());
        assert_eq!(session.deck(), &before);

        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Cannot delete");
        assert_eq!(notices[0].description, "You must have at least one slide");
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_edits_apply_to_current_slide() {
        let mut session = CarouselSession::new();
        session.add_slide();
        session.set_background_color("#000000");
        session.editor_mut().text_input = "Hello".into();
        session.add_text().expect("add");

        assert_eq!(session.deck().slides()[0].background_color, "#ffffff");
        assert_eq!(session.current_slide().background_color, "#000000");
        assert_eq!(session.current_slide().texts(), vec!["Hello".to_string()]);
    }

    #[test]
    fn test_blank_text_rejected_with_notice() {
        let mut session = CarouselSession::new();
        session.editor_mut().text_input = "  ".into();
        assert!(session.add_text().is_err());
        assert!(session.current_slide().text_elements.is_empty());
        assert!(session.drain_notices()[0].is_error());
    }

    #[test]
    fn test_uploads() {
        let mut session = CarouselSession::new();
        session.upload_background_image(PNG).expect("background");
        assert!(session
            .current_slide()
            .background_image
            .starts_with("data:image/png;base64,"));

        assert!(session.upload_grid_image(0, PNG).is_err(), "not a grid yet");
        session.set_background_type(BackgroundType::Grid2x1);
        session.upload_grid_image(1, PNG).expect("cell 1");
        assert_eq!(session.current_slide().grid_image(0), None);
        assert!(session.current_slide().grid_image(1).is_some());

        assert!(session.upload_background_image(b"not an image").is_err());
        assert_eq!(session.drain_notices().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_text_needs_product() {
        let mut session = CarouselSession::new();
        let err = session.generate_text(&Echo).await.unwrap_err();
        assert!(matches!(err, CarouselError::NoProductSelected));
        assert_eq!(session.drain_notices()[0].title, "Please select a product first");
    }

    #[tokio::test]
    async fn test_generate_text_fills_input() {
        let mut session = CarouselSession::new();
        session.select_product(Some(ProductBrief::new("Glow", "Skin tracker")));
        session.generate_text(&Echo).await.expect("generated");

        assert_eq!(session.editor().text_input, "Glow slide 1");
        assert_eq!(session.drain_notices()[0].title, "AI text generated!");
    }

    #[test]
    fn test_document_round_trip_keeps_aspect() {
        let mut session = CarouselSession::new();
        session.set_aspect_ratio(AspectRatio::Square);
        session.add_slide();

        let resumed = CarouselSession::from_document(session.to_document()).expect("resume");
        assert_eq!(resumed.aspect_ratio(), AspectRatio::Square);
        assert_eq!(resumed.deck().len(), 2);
        assert_eq!(resumed.deck().current_index(), 0);
    }
}
