//! Input validation for untrusted request bodies.
//!
//! Everything a client sends is checked here before it reaches the
//! completions API or the renderer.

use carousel_core::{ProductBrief, Slide};
use carousel_renderer::raster::{is_embedded, source_label};
use thiserror::Error;

/// Maximum slides in one export.
pub const MAX_SLIDES_PER_EXPORT: usize = 100;
/// Maximum characters in one text element.
pub const MAX_TEXT_LEN: usize = 2000;
/// Maximum hooks per request.
pub const MAX_HOOK_COUNT: usize = 50;

/// Validation error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Product missing, or without a name.
    #[error("Product information is required")]
    ProductRequired,
    /// Export request without slides.
    #[error("No slides to export")]
    NoSlides,
    /// Export request over the slide cap.
    #[error("too many slides (max {MAX_SLIDES_PER_EXPORT})")]
    TooManySlides,
    /// A text element over the length cap.
    #[error("text on slide {slide} too long (max {MAX_TEXT_LEN} chars)")]
    TextTooLong {
        /// 1-based slide number.
        slide: usize,
    },
    /// An image referenced by path or URL instead of embedded.
    #[error("images on slide {slide} must be embedded as data URIs")]
    ImageNotEmbedded {
        /// 1-based slide number.
        slide: usize,
    },
    /// Hook count out of range.
    #[error("count must be between 1 and {MAX_HOOK_COUNT}")]
    HookCountOutOfRange,
    /// Slide number must be 1-based.
    #[error("slideNumber must be at least 1")]
    SlideNumberZero,
}

impl ValidationError {
    /// Short label for metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProductRequired => "product",
            Self::NoSlides | Self::TooManySlides => "slide_count",
            Self::TextTooLong { .. } => "text_length",
            Self::ImageNotEmbedded { .. } => "image_source",
            Self::HookCountOutOfRange => "hook_count",
            Self::SlideNumberZero => "slide_number",
        }
    }
}

/// Require a product with an app name.
///
/// # Errors
///
/// Returns [`ValidationError::ProductRequired`] if the product is missing or
/// its name is blank.
pub fn validate_product(product: Option<&ProductBrief>) -> Result<&ProductBrief, ValidationError> {
    product
        .filter(|p| !p.app_name.trim().is_empty())
        .ok_or(ValidationError::ProductRequired)
}

/// Validate a hook count.
///
/// # Errors
///
/// Returns [`ValidationError::HookCountOutOfRange`] outside `1..=50`.
pub fn validate_hook_count(count: usize) -> Result<usize, ValidationError> {
    if (1..=MAX_HOOK_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(ValidationError::HookCountOutOfRange)
    }
}

/// Validate a 1-based slide number.
///
/// # Errors
///
/// Returns [`ValidationError::SlideNumberZero`] for zero.
pub fn validate_slide_number(slide_number: usize) -> Result<usize, ValidationError> {
    if slide_number == 0 {
        Err(ValidationError::SlideNumberZero)
    } else {
        Ok(slide_number)
    }
}

/// Validate one slide; `position` is its 0-based index in the deck.
///
/// # Errors
///
/// Returns [`ValidationError::TextTooLong`] for an oversized text element, or
/// [`ValidationError::ImageNotEmbedded`] for any image source that is not a
/// `data:` URI, drawn or not.
pub fn validate_slide(slide: &Slide, position: usize) -> Result<(), ValidationError> {
    if slide
        .text_elements
        .iter()
        .any(|t| t.text.chars().count() > MAX_TEXT_LEN)
    {
        return Err(ValidationError::TextTooLong {
            slide: position + 1,
        });
    }

    let external = std::iter::once(slide.background_image.as_str())
        .chain(slide.grid_images.iter().map(String::as_str))
        .chain(slide.sticker_elements.iter().map(|s| s.src.as_str()))
        .find(|src| !src.is_empty() && !is_embedded(src));
    if let Some(src) = external {
        tracing::warn!(slide = position + 1, src = %source_label(src), "Rejected external image source");
        return Err(ValidationError::ImageNotEmbedded {
            slide: position + 1,
        });
    }
    Ok(())
}

/// Validate a deck for batch export.
///
/// # Errors
///
/// Returns an error for an empty or oversized deck, or any invalid slide.
pub fn validate_slides(slides: &[Slide]) -> Result<(), ValidationError> {
    if slides.is_empty() {
        return Err(ValidationError::NoSlides);
    }
    if slides.len() > MAX_SLIDES_PER_EXPORT {
        return Err(ValidationError::TooManySlides);
    }
    slides
        .iter()
        .enumerate()
        .try_for_each(|(i, slide)| validate_slide(slide, i))
}
