//! Slide editor.
//!
//! Every edit returns a new [`Slide`]; the input slide is never mutated. The
//! caller hands the result to [`SlideDeck::update_current_slide`].
//!
//! [`SlideDeck::update_current_slide`]: crate::SlideDeck::update_current_slide

use crate::copy::{CopyGenerator, CopyRequest, ProductBrief};
use crate::slide::{
    BackgroundType, ElementId, Slide, StickerElement, TextElement, TextPosition, TextSize,
    DEFAULT_FONT_FAMILY, TEXT_COLOR,
};
use crate::{CarouselError, CarouselResult};

/// Editor state that is not part of any slide: the text input field and the
/// currently selected text settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideEditor {
    /// Contents of the text input field.
    pub text_input: String,
    /// Selected size for new text.
    pub text_size: TextSize,
    /// Selected anchor for new text.
    pub text_position: TextPosition,
    /// Selected font family for new text.
    pub font_family: String,
}

impl Default for SlideEditor {
    fn default() -> Self {
        Self {
            text_input: String::new(),
            text_size: TextSize::Medium,
            text_position: TextPosition::Center,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl SlideEditor {
    /// Create an editor with default selections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the background type.
    ///
    /// Colour, image and grid fields are kept so switching back restores
    /// earlier input. Switching to a grid pads `grid_images` with empty
    /// cells up to the grid's cell count; it never truncates.
    #[must_use]
    pub fn set_background_type(&self, slide: &Slide, background_type: BackgroundType) -> Slide {
        let mut next = slide.clone();
        next.background_type = background_type;
        if let Some(grid) = background_type.grid() {
            if next.grid_images.len() < grid.cell_count() {
                next.grid_images.resize(grid.cell_count(), String::new());
            }
        }
        next
    }

    /// Set the solid background colour.
    #[must_use]
    pub fn set_background_color(&self, slide: &Slide, color: impl Into<String>) -> Slide {
        Slide {
            background_color: color.into(),
            ..slide.clone()
        }
    }

    /// Set the single background image (usually a data URI).
    #[must_use]
    pub fn set_background_image(&self, slide: &Slide, src: impl Into<String>) -> Slide {
        Slide {
            background_image: src.into(),
            ..slide.clone()
        }
    }

    /// Set the image of one grid cell.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::InvalidOperation`] if the slide does not have
    /// a grid background, or [`CarouselError::GridIndexOutOfRange`] if
    /// `index` is not a cell of the current grid.
    pub fn set_grid_image(
        &self,
        slide: &Slide,
        index: usize,
        src: impl Into<String>,
    ) -> CarouselResult<Slide> {
        let grid = slide.background_type.grid().ok_or_else(|| {
            CarouselError::InvalidOperation(format!(
                "{} background has no grid cells",
                slide.background_type
            ))
        })?;
        let cells = grid.cell_count();
        if index >= cells {
            return Err(CarouselError::GridIndexOutOfRange { index, cells });
        }

        let mut next = slide.clone();
        if next.grid_images.len() < cells {
            next.grid_images.resize(cells, String::new());
        }
        next.grid_images[index] = src.into();
        Ok(next)
    }

    /// Append a text element built from the input field and the current
    /// selections, then clear the input field.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::EmptyText`] if the input is empty or
    /// whitespace only; nothing changes in that case.
    pub fn add_text_element(&mut self, slide: &Slide) -> CarouselResult<Slide> {
        if self.text_input.trim().is_empty() {
            return Err(CarouselError::EmptyText);
        }

        let element = TextElement {
            id: ElementId::new(),
            text: std::mem::take(&mut self.text_input),
            color: TEXT_COLOR.to_string(),
            font_size: self.text_size.px(),
            font_family: self.font_family.clone(),
            position: self.text_position,
        };

        let mut next = slide.clone();
        next.text_elements.push(element);
        Ok(next)
    }

    /// Drop the text element with `id`. Unknown ids leave the slide as is.
    #[must_use]
    pub fn remove_text_element(&self, slide: &Slide, id: ElementId) -> Slide {
        let mut next = slide.clone();
        next.text_elements.retain(|el| el.id != id);
        next
    }

    /// Append a sticker overlay.
    #[must_use]
    pub fn add_sticker(&self, slide: &Slide, sticker: StickerElement) -> Slide {
        let mut next = slide.clone();
        next.sticker_elements.push(sticker);
        next
    }

    /// Drop the sticker with `id`.
    #[must_use]
    pub fn remove_sticker(&self, slide: &Slide, id: ElementId) -> Slide {
        let mut next = slide.clone();
        next.sticker_elements.retain(|el| el.id != id);
        next
    }

    /// Ask the generator for copy and place it in the input field.
    ///
    /// The suggestion is not committed as a text element; the user accepts
    /// or edits it first. On failure the input field is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::NoProductSelected`] without a product, or the
    /// generator's error.
    pub async fn suggest_text(
        &mut self,
        generator: &dyn CopyGenerator,
        product: Option<&ProductBrief>,
        slide: &Slide,
    ) -> CarouselResult<()> {
        let product = product.ok_or(CarouselError::NoProductSelected)?;
        let request = CopyRequest {
            product: product.clone(),
            slide_number: slide.text_elements.len() + 1,
            existing_texts: slide.texts(),
        };

        tracing::debug!(slide_number = request.slide_number, "Requesting AI copy");
        let text = generator.generate(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(CarouselError::Generation(
                "Failed to generate text".to_string(),
            ));
        }

        self.text_input = text.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedCopy {
        reply: CarouselResult<String>,
        seen: Mutex<Vec<CopyRequest>>,
    }

    impl FixedCopy {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(CarouselError::Generation(message.to_string())),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CopyGenerator for FixedCopy {
        async fn generate(&self, request: &CopyRequest) -> CarouselResult<String> {
            self.seen.lock().expect("lock").push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(CarouselError::Generation(e.to_string())),
            }
        }
    }

    #[test]
    fn test_whitespace_text_rejected() {
        let mut editor = SlideEditor::new();
        editor.text_input = "   \n\t".into();
        let slide = Slide::new();

        let err = editor.add_text_element(&slide).unwrap_err();
        assert!(matches!(err, CarouselError::EmptyText));
        assert!(slide.text_elements.is_empty());
        assert_eq!(editor.text_input, "   \n\t");
    }

    #[test]
    fn test_add_text_uses_selected_settings() {
        let mut editor = SlideEditor::new();
        editor.text_input = "Hello".into();
        editor.text_size = TextSize::Large;
        editor.text_position = TextPosition::Bottom;

        let slide = Slide::new();
        let next = editor.add_text_element(&slide).expect("added");

        assert!(slide.text_elements.is_empty(), "input slide untouched");
        assert_eq!(next.text_elements.len(), 1);
        let el = &next.text_elements[0];
        assert_eq!(el.text, "Hello");
        assert!((el.font_size - 32.0).abs() < f32::EPSILON);
        assert_eq!(el.position, TextPosition::Bottom);
        assert_eq!(el.color, TEXT_COLOR);
        assert_eq!(el.font_family, "Arial");
        assert!(editor.text_input.is_empty());
    }

    #[test]
    fn test_text_keeps_line_breaks() {
        let mut editor = SlideEditor::new();
        editor.text_input = "Line one\nLine two".into();
        let next = editor.add_text_element(&Slide::new()).expect("added");
        assert_eq!(next.text_elements[0].text, "Line one\nLine two");
    }

    #[test]
    fn test_remove_text_element_filters_by_id() {
        let mut editor = SlideEditor::new();
        editor.text_input = "a".into();
        let slide = editor.add_text_element(&Slide::new()).expect("a");
        editor.text_input = "b".into();
        let slide = editor.add_text_element(&slide).expect("b");

        let first = slide.text_elements[0].id;
        let next = editor.remove_text_element(&slide, first);
        assert_eq!(next.texts(), vec!["b".to_string()]);

        let unchanged = editor.remove_text_element(&next, ElementId::new());
        assert_eq!(unchanged, next);
    }

    #[test]
    fn test_background_switch_preserves_fields() {
        let editor = SlideEditor::new();
        let slide = editor.set_background_color(&Slide::new(), "#ff0000");
        let slide = editor.set_background_image(&slide, "data:image/png;base64,AAAA");
        let slide = editor.set_background_type(&slide, BackgroundType::Grid3x3);
        let slide = editor
            .set_grid_image(&slide, 8, "data:image/png;base64,BBBB")
            .expect("cell 8");

        let back = editor.set_background_type(&slide, BackgroundType::Color);
        assert_eq!(back.background_color, "#ff0000");
        assert_eq!(back.background_image, "data:image/png;base64,AAAA");
        assert_eq!(back.grid_images.len(), 9);

        // Shrinking to a smaller grid keeps the extra cells around.
        let small = editor.set_background_type(&back, BackgroundType::Grid2x1);
        assert_eq!(small.grid_images.len(), 9);
        assert_eq!(small.grid_images[8], "data:image/png;base64,BBBB");
    }

    #[test]
    fn test_switch_to_grid_presizes_cells() {
        let editor = SlideEditor::new();
        let slide = editor.set_background_type(&Slide::new(), BackgroundType::Grid2x2);
        assert_eq!(slide.grid_images, vec![String::new(); 4]);
    }

    #[test]
    fn test_grid_image_bounds() {
        let editor = SlideEditor::new();
        let slide = editor.set_background_type(&Slide::new(), BackgroundType::Grid1x2);
        assert!(matches!(
            editor.set_grid_image(&slide, 2, "x"),
            Err(CarouselError::GridIndexOutOfRange { index: 2, cells: 2 })
        ));

        let color = Slide::new();
        assert!(matches!(
            editor.set_grid_image(&color, 0, "x"),
            Err(CarouselError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_stickers_add_remove() {
        let editor = SlideEditor::new();
        let sticker = StickerElement::new("data:image/png;base64,AAAA", 10.0, 20.0, 100.0, 50.0);
        let id = sticker.id;
        let slide = editor.add_sticker(&Slide::new(), sticker);
        assert_eq!(slide.sticker_elements.len(), 1);
        let slide = editor.remove_sticker(&slide, id);
        assert!(slide.sticker_elements.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_text_fills_input_with_context() {
        let mut editor = SlideEditor::new();
        editor.text_input = "first".into();
        let slide = editor.add_text_element(&Slide::new()).expect("first");

        let generator = FixedCopy::ok("  Your skin, decoded.  ");
        let product = ProductBrief::new("Glow", "Skin tracker");
        editor
            .suggest_text(&generator, Some(&product), &slide)
            .await
            .expect("suggestion");

        assert_eq!(editor.text_input, "Your skin, decoded.");
        assert_eq!(slide.text_elements.len(), 1, "suggestion is not committed");

        let seen = generator.seen.lock().expect("lock");
        assert_eq!(seen[0].slide_number, 2);
        assert_eq!(seen[0].existing_texts, vec!["first".to_string()]);
    }

    #[tokio::test]
    async fn test_suggest_text_failure_leaves_input() {
        let mut editor = SlideEditor::new();
        editor.text_input = "draft".into();
        let generator = FixedCopy::failing("upstream down");
        let product = ProductBrief::new("Glow", "Skin tracker");

        let err = editor
            .suggest_text(&generator, Some(&product), &Slide::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "upstream down");
        assert_eq!(editor.text_input, "draft");
    }

    #[tokio::test]
    async fn test_suggest_text_requires_product() {
        let mut editor = SlideEditor::new();
        let generator = FixedCopy::ok("never used");
        let err = editor
            .suggest_text(&generator, None, &Slide::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CarouselError::NoProductSelected));
        assert!(generator.seen.lock().expect("lock").is_empty());
    }
}
