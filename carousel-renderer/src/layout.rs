//! Slide layout.
//!
//! Turns a [`Slide`] authored in the 1080x1920 space into absolute geometry
//! for a target pixel size. Every authored length (font size, sticker box,
//! text padding and offsets) is multiplied by the same factor
//! `min(width / 1080, height / 1920)`.

use carousel_core::{scale_factor, BackgroundType, GridLayout, Slide, TextPosition};

use crate::text::{cells_per_line, wrap_text};

/// Horizontal padding of a text block, in authoring units.
pub const TEXT_PADDING: f32 = 16.0;

/// Distance of top/bottom text blocks from the slide edge, in authoring units.
pub const TEXT_EDGE_OFFSET: f32 = 32.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.25;

/// Outline offset of the text shadow copies, in authoring units.
pub const OUTLINE_OFFSET: f32 = 1.0;

/// Font size of the empty grid cell label, in authoring units.
pub const PLACEHOLDER_FONT_SIZE: f32 = 14.0;

/// Fill of a grid cell with no image.
pub const PLACEHOLDER_FILL: &str = "#f3f4f6";

/// Colour of the empty grid cell label.
pub const PLACEHOLDER_TEXT_COLOR: &str = "#9ca3af";

/// Label of an empty grid cell.
pub const PLACEHOLDER_LABEL: &str = "No image";

/// Rendered text colour. The model's `color` field is not consulted.
pub const RENDER_TEXT_COLOR: &str = "#FFFFFF";

/// Outline colour drawn behind text.
pub const OUTLINE_COLOR: &str = "#000000";

// Approximate cap height used to centre a line's glyphs in its line box.
const CAP_HEIGHT: f32 = 0.7;

/// An axis-aligned rectangle in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// One cell of a grid background.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    /// Cell bounds.
    pub rect: Rect,
    /// Image source, or `None` for the placeholder.
    pub src: Option<String>,
}

/// Resolved background.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundLayer {
    /// Solid fill. Gradient slides render this way too.
    Color(String),
    /// Full-bleed image, cropped to cover. `None` when no image is set.
    Image(Option<String>),
    /// Image grid.
    Grid(Vec<GridCell>),
}

/// A positioned, wrapped text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Wrapped lines; empty strings are blank lines.
    pub lines: Vec<String>,
    /// Font size in output pixels.
    pub font_px: f32,
    /// Distance between baselines.
    pub line_height: f32,
    /// Horizontal centre of every line.
    pub center_x: f32,
    /// Top of the block.
    pub top: f32,
    /// Font family as authored.
    pub font_family: String,
    /// Offset of the outline copies.
    pub outline: f32,
}

impl TextBlock {
    /// Total block height.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    /// Baseline of line `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn baseline(&self, index: usize) -> f32 {
        self.top
            + index as f32 * self.line_height
            + (self.line_height + self.font_px * CAP_HEIGHT) / 2.0
    }
}

/// A positioned sticker.
#[derive(Debug, Clone, PartialEq)]
pub struct StickerBox {
    /// Image source.
    pub src: String,
    /// Bounds; the image is fitted inside, keeping its aspect ratio.
    pub rect: Rect,
}

/// Absolute geometry of one slide at one output size.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    /// Output width in pixels.
    pub width: f32,
    /// Output height in pixels.
    pub height: f32,
    /// Authoring-to-output factor.
    pub scale: f32,
    /// Background layer.
    pub background: BackgroundLayer,
    /// Text blocks, in append order.
    pub texts: Vec<TextBlock>,
    /// Stickers, drawn last.
    pub stickers: Vec<StickerBox>,
}

impl SlideLayout {
    /// Lay `slide` out for a `width` x `height` pixel target.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(slide: &Slide, width: u32, height: u32) -> Self {
        let scale = scale_factor(width, height);
        let (w, h) = (width as f32, height as f32);

        let background = match (slide.background_type, slide.background_type.grid()) {
            (_, Some(grid)) => BackgroundLayer::Grid(grid_cells(slide, grid, w, h)),
            (BackgroundType::Image, None) => BackgroundLayer::Image(
                Some(slide.background_image.clone()).filter(|src| !src.is_empty()),
            ),
            _ => BackgroundLayer::Color(slide.background_color.clone()),
        };

        let texts = slide
            .text_elements
            .iter()
            .map(|el| {
                let font_px = el.font_size * scale;
                let padding = TEXT_PADDING * scale;
                let max_cells = cells_per_line(w - 2.0 * padding, font_px);
                let mut block = TextBlock {
                    lines: wrap_text(&el.text, max_cells),
                    font_px,
                    line_height: font_px * LINE_HEIGHT,
                    center_x: w / 2.0,
                    top: 0.0,
                    font_family: el.font_family.clone(),
                    outline: OUTLINE_OFFSET * scale,
                };
                block.top = match el.position {
                    TextPosition::Top => TEXT_EDGE_OFFSET * scale,
                    TextPosition::Center => (h - block.height()) / 2.0,
                    TextPosition::Bottom => h - TEXT_EDGE_OFFSET * scale - block.height(),
                };
                block
            })
            .collect();

        let stickers = slide
            .sticker_elements
            .iter()
            .filter(|s| !s.src.is_empty())
            .map(|s| StickerBox {
                src: s.src.clone(),
                rect: Rect {
                    x: s.x * scale,
                    y: s.y * scale,
                    width: s.width * scale,
                    height: s.height * scale,
                },
            })
            .collect();

        Self {
            width: w,
            height: h,
            scale,
            background,
            texts,
            stickers,
        }
    }

    /// Every image reference this layout draws, in paint order.
    #[must_use]
    pub fn image_sources(&self) -> Vec<&str> {
        let background: Vec<&str> = match &self.background {
            BackgroundLayer::Color(_) | BackgroundLayer::Image(None) => Vec::new(),
            BackgroundLayer::Image(Some(src)) => vec![src.as_str()],
            BackgroundLayer::Grid(cells) => cells.iter().filter_map(|c| c.src.as_deref()).collect(),
        };
        background
            .into_iter()
            .chain(self.stickers.iter().map(|s| s.src.as_str()))
            .collect()
    }
}

#[allow(clippy::cast_precision_loss)]
fn grid_cells(slide: &Slide, grid: GridLayout, width: f32, height: f32) -> Vec<GridCell> {
    let cell_w = width / grid.columns as f32;
    let cell_h = height / grid.rows as f32;
    (0..grid.cell_count())
        .map(|index| {
            let (col, row) = (index % grid.columns, index / grid.columns);
            GridCell {
                rect: Rect {
                    x: col as f32 * cell_w,
                    y: row as f32 * cell_h,
                    width: cell_w,
                    height: cell_h,
                },
                src: slide.grid_image(index).map(str::to_string),
            }
        })
        .collect()
}
