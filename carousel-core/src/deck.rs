//! Slide deck: the ordered slide list and the current-slide cursor.

use serde::{Deserialize, Serialize};

use crate::{AspectRatio, CarouselError, CarouselResult, Slide, SlideId};

/// An ordered, never-empty sequence of slides with exactly one current slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDeck {
    slides: Vec<Slide>,
    current: usize,
}

impl SlideDeck {
    /// Create a deck holding one default slide.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slides: vec![Slide::new()],
            current: 0,
        }
    }

    /// Build a deck from existing slides. The first slide becomes current.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::EmptyDeck`] if `slides` is empty.
    pub fn from_slides(slides: Vec<Slide>) -> CarouselResult<Self> {
        if slides.is_empty() {
            return Err(CarouselError::EmptyDeck);
        }
        Ok(Self { slides, current: 0 })
    }

    /// Duplicate the current slide, insert the copy right after it and make
    /// the copy current. Returns the new slide's id.
    pub fn add_slide(&mut self) -> SlideId {
        let copy = self.current_slide().duplicate();
        let id = copy.id;
        let at = self.current + 1;
        self.slides.insert(at, copy);
        self.current = at;
        tracing::debug!(slide = %id, index = at, "Added slide");
        id
    }

    /// Remove the slide at `index`.
    ///
    /// When the removed slide was at or before the cursor, the cursor moves
    /// back by one (clamped to zero) so it keeps pointing at a nearby slide.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::CannotDeleteLastSlide`] if only one slide
    /// remains, or [`CarouselError::SlideIndexOutOfRange`] for a bad index.
    /// The deck is unchanged on error.
    pub fn delete_slide(&mut self, index: usize) -> CarouselResult<Slide> {
        if self.slides.len() <= 1 {
            return Err(CarouselError::CannotDeleteLastSlide);
        }
        self.check_index(index)?;

        let removed = self.slides.remove(index);
        if index <= self.current {
            self.current = self.current.saturating_sub(1);
        }
        tracing::debug!(slide = %removed.id, index, current = self.current, "Deleted slide");
        Ok(removed)
    }

    /// Move the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::SlideIndexOutOfRange`] if `index` is past the end.
    pub fn set_current_slide_index(&mut self, index: usize) -> CarouselResult<()> {
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    /// Advance to the next slide. Returns `false` at the last slide.
    pub fn next_slide(&mut self) -> bool {
        if self.current + 1 < self.slides.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Step back to the previous slide. Returns `false` at the first slide.
    pub fn previous_slide(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Replace the current slide with an edited copy.
    pub fn update_current_slide(&mut self, slide: Slide) {
        self.slides[self.current] = slide;
    }

    /// Index of the current slide.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The current slide.
    #[must_use]
    pub fn current_slide(&self) -> &Slide {
        &self.slides[self.current]
    }

    /// Slide at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// All slides in order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    fn check_index(&self, index: usize) -> CarouselResult<()> {
        if index < self.slides.len() {
            Ok(())
        } else {
            Err(CarouselError::SlideIndexOutOfRange {
                index,
                len: self.slides.len(),
            })
        }
    }
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized form of a deck, as stored in deck files and sent to the
/// export endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDocument {
    /// Export aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Slides in order.
    pub slides: Vec<Slide>,
}

impl DeckDocument {
    /// Snapshot a deck.
    #[must_use]
    pub fn from_deck(deck: &SlideDeck, aspect_ratio: AspectRatio) -> Self {
        Self {
            aspect_ratio,
            slides: deck.slides().to_vec(),
        }
    }

    /// Convert back into a deck.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::EmptyDeck`] if the document has no slides.
    pub fn into_deck(self) -> CarouselResult<SlideDeck> {
        SlideDeck::from_slides(self.slides)
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CarouselResult<String> {
        serde_json::to_string_pretty(self).map_err(CarouselError::Serialization)
    }

    /// Deserialize from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CarouselResult<Self> {
        serde_json::from_str(json).map_err(CarouselError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackgroundType, TextElement, TextPosition, TextSize};

    fn deck_of(n: usize) -> SlideDeck {
        let slides = (0..n)
            .map(|i| {
                let mut slide = Slide::new();
                slide.text_elements.push(TextElement::new(
                    format!("Slide {i}"),
                    TextSize::Medium,
                    TextPosition::Center,
                ));
                slide
            })
            .collect();
        SlideDeck::from_slides(slides).expect("non-empty")
    }

    #[test]
    fn test_new_deck_has_one_current_slide() {
        let deck = SlideDeck::new();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.current_index(), 0);
        assert!(!deck.is_empty());
    }

    #[test]
    fn test_delete_last_slide_rejected() {
        let mut deck = SlideDeck::new();
        let before = deck.clone();
        let err = deck.delete_slide(0).unwrap_err();
        assert!(matches!(err, CarouselError::CannotDeleteLastSlide));
        assert_eq!(deck, before);
    }

    #[test]
    fn test_add_slide_duplicates_current_after_cursor() {
        let mut deck = deck_of(3);
        deck.set_current_slide_index(1).expect("in range");
        let original = deck.current_slide().clone();

        let id = deck.add_slide();

        assert_eq!(deck.len(), 4);
        assert_eq!(deck.current_index(), 2);
        let added = deck.current_slide();
        assert_eq!(added.id, id);
        assert_ne!(added.id, original.id);
        assert_eq!(Slide { id: original.id, ..added.clone() }, original);
        // Slide after the insertion point moved down one.
        assert_eq!(deck.get(3).map(|s| s.texts()), Some(vec!["Slide 2".to_string()]));
    }

    #[test]
    fn test_added_slide_does_not_alias_source() {
        let mut deck = SlideDeck::new();
        let mut first = deck.current_slide().clone();
        first.background_type = BackgroundType::Grid2x1;
        first.grid_images = vec!["a".into(), "b".into()];
        deck.update_current_slide(first);

        deck.add_slide();
        let mut copy = deck.current_slide().clone();
        copy.grid_images[0] = "changed".into();
        copy.text_elements
            .push(TextElement::new("only on copy", TextSize::Small, TextPosition::Top));
        deck.update_current_slide(copy);

        let source = deck.get(0).expect("source");
        assert_eq!(source.grid_images, vec!["a".to_string(), "b".to_string()]);
        assert!(source.text_elements.is_empty());
    }

    #[test]
    fn test_delete_before_cursor_moves_cursor_back() {
        let mut deck = deck_of(4);
        deck.set_current_slide_index(2).expect("in range");
        deck.delete_slide(0).expect("delete");
        assert_eq!(deck.current_index(), 1);
        assert_eq!(deck.current_slide().texts(), vec!["Slide 2".to_string()]);
    }

    #[test]
    fn test_delete_at_cursor_moves_cursor_back() {
        let mut deck = deck_of(3);
        deck.set_current_slide_index(1).expect("in range");
        deck.delete_slide(1).expect("delete");
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_delete_first_at_cursor_zero_clamps() {
        let mut deck = deck_of(3);
        deck.delete_slide(0).expect("delete");
        assert_eq!(deck.current_index(), 0);
        assert_eq!(deck.current_slide().texts(), vec!["Slide 1".to_string()]);
    }

    #[test]
    fn test_delete_after_cursor_keeps_cursor() {
        let mut deck = deck_of(3);
        deck.set_current_slide_index(1).expect("in range");
        deck.delete_slide(2).expect("delete");
        assert_eq!(deck.current_index(), 1);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut deck = deck_of(2);
        assert!(matches!(
            deck.set_current_slide_index(2),
            Err(CarouselError::SlideIndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(deck.delete_slide(5).is_err());
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_navigation_clamps_at_ends() {
        let mut deck = deck_of(2);
        assert!(!deck.previous_slide());
        assert!(deck.next_slide());
        assert!(!deck.next_slide());
        assert_eq!(deck.current_index(), 1);
    }

    #[test]
    fn test_from_slides_rejects_empty() {
        assert!(matches!(
            SlideDeck::from_slides(Vec::new()),
            Err(CarouselError::EmptyDeck)
        ));
    }

    #[test]
    fn test_document_round_trip() {
        let deck = deck_of(2);
        let doc = DeckDocument::from_deck(&deck, AspectRatio::Square);
        let json = doc.to_json().expect("json");
        assert!(json.contains("\"aspectRatio\": \"1:1\""));

        let back = DeckDocument::from_json(&json)
            .expect("parse")
            .into_deck()
            .expect("deck");
        assert_eq!(back.slides(), deck.slides());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn add_then_delete_keeps_cursor_valid(
                ops in proptest::collection::vec((any::<bool>(), 0usize..8), 1..40)
            ) {
                let mut deck = SlideDeck::new();
                for (add, index) in ops {
                    if add {
                        let before = deck.len();
                        deck.add_slide();
                        prop_assert_eq!(deck.len(), before + 1);
                    } else {
                        let before = deck.len();
                        match deck.delete_slide(index) {
                            Ok(_) => prop_assert_eq!(deck.len(), before - 1),
                            Err(_) => prop_assert_eq!(deck.len(), before),
                        }
                    }
                    prop_assert!(!deck.is_empty());
                    prop_assert!(deck.current_index() < deck.len());
                }
            }
        }
    }
}
