//! On-screen preview frame.
//!
//! The preview shows a slide at a fixed display width while keeping the
//! chosen aspect ratio. It is laid out at the export pixel size and scaled
//! down through the SVG `viewBox`, so the preview and the exports share one
//! layout.

use carousel_core::{AspectRatio, Slide};

use crate::layout::SlideLayout;
use crate::svg::render_svg_sized;

/// Display width of portrait, square and story previews.
pub const PREVIEW_WIDTH: f32 = 384.0;

/// Display width of landscape previews.
pub const PREVIEW_WIDTH_LANDSCAPE: f32 = 672.0;

/// A slide prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    /// Aspect ratio shown.
    pub aspect_ratio: AspectRatio,
    /// Layout at export size.
    pub layout: SlideLayout,
    /// Display width.
    pub display_width: f32,
    /// Display height.
    pub display_height: f32,
}

impl PreviewFrame {
    /// Frame `slide` for `aspect_ratio`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(slide: &Slide, aspect_ratio: AspectRatio) -> Self {
        let config = aspect_ratio.config();
        let display_width = match aspect_ratio {
            AspectRatio::Landscape => PREVIEW_WIDTH_LANDSCAPE,
            AspectRatio::Story | AspectRatio::Square | AspectRatio::Portrait => PREVIEW_WIDTH,
        };
        let display_height = display_width * config.height as f32 / config.width as f32;
        Self {
            aspect_ratio,
            layout: SlideLayout::compute(slide, config.width, config.height),
            display_width,
            display_height,
        }
    }

    /// The preview as an SVG document.
    #[must_use]
    pub fn to_svg(&self, base_fill: &str) -> String {
        render_svg_sized(
            &self.layout,
            base_fill,
            self.display_width,
            self.display_height,
        )
    }
}
