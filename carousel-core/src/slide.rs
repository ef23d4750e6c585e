//! Slides - the unit of composition.
//!
//! A slide is plain data: a background (solid colour, single image, or an
//! image grid) plus overlay text and sticker elements positioned in the
//! 1080-wide authoring space.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed text colour written by the editor (white with a black outline).
pub const TEXT_COLOR: &str = "#FFFFFF";

/// Default background colour for new slides.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Default font family for new text elements.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Unique identifier for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId(Uuid);

impl SlideId {
    /// Create a new unique slide ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SlideId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a text or sticker element. Unique within its slide only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What fills the slide behind its overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundType {
    /// Solid `background_color`.
    Color,
    /// Single `background_image`, cover-fitted.
    Image,
    /// Declared but never offered by the editor; renders as `Color`.
    Gradient,
    /// Two columns, two rows.
    #[serde(rename = "grid-2x2", alias = "grid")]
    Grid2x2,
    /// Two columns, one row.
    #[serde(rename = "grid-2x1")]
    Grid2x1,
    /// One column, two rows.
    #[serde(rename = "grid-1x2")]
    Grid1x2,
    /// Three columns, three rows.
    #[serde(rename = "grid-3x3")]
    Grid3x3,
}

impl BackgroundType {
    /// Every background type the editor offers, in toolbar order.
    pub const EDITABLE: [Self; 6] = [
        Self::Color,
        Self::Image,
        Self::Grid2x2,
        Self::Grid2x1,
        Self::Grid1x2,
        Self::Grid3x3,
    ];

    /// Grid geometry for grid variants, `None` otherwise.
    #[must_use]
    pub fn grid(self) -> Option<GridLayout> {
        match self {
            Self::Grid2x2 => Some(GridLayout::new(2, 2)),
            Self::Grid2x1 => Some(GridLayout::new(2, 1)),
            Self::Grid1x2 => Some(GridLayout::new(1, 2)),
            Self::Grid3x3 => Some(GridLayout::new(3, 3)),
            Self::Color | Self::Image | Self::Gradient => None,
        }
    }

    /// Whether this is one of the grid variants.
    #[must_use]
    pub fn is_grid(self) -> bool {
        self.grid().is_some()
    }

    /// Stable tag used in JSON and file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Image => "image",
            Self::Gradient => "gradient",
            Self::Grid2x2 => "grid-2x2",
            Self::Grid2x1 => "grid-2x1",
            Self::Grid1x2 => "grid-1x2",
            Self::Grid3x3 => "grid-3x3",
        }
    }
}

impl std::fmt::Display for BackgroundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackgroundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(Self::Color),
            "image" => Ok(Self::Image),
            "gradient" => Ok(Self::Gradient),
            "grid" | "grid-2x2" => Ok(Self::Grid2x2),
            "grid-2x1" => Ok(Self::Grid2x1),
            "grid-1x2" => Ok(Self::Grid1x2),
            "grid-3x3" => Ok(Self::Grid3x3),
            other => Err(format!("unknown background type: {other}")),
        }
    }
}

/// Column/row geometry of a grid background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of columns.
    pub columns: usize,
    /// Number of rows.
    pub rows: usize,
}

impl GridLayout {
    /// Create a grid layout.
    #[must_use]
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.columns * self.rows
    }
}

/// Vertical anchor of a text block. Horizontal is always centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPosition {
    /// Anchored near the top edge.
    Top,
    /// Vertically centered.
    #[default]
    Center,
    /// Anchored near the bottom edge.
    Bottom,
}

impl std::str::FromStr for TextPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "center" => Ok(Self::Center),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("unknown text position: {other}")),
        }
    }
}

/// Text sizes offered by the editor, in authoring pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSize {
    /// 16px.
    Small,
    /// 24px.
    #[default]
    Medium,
    /// 32px.
    Large,
    /// 42px.
    XLarge,
}

impl TextSize {
    /// All sizes, smallest first.
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::XLarge];

    /// Size in authoring pixels.
    #[must_use]
    pub fn px(self) -> f32 {
        match self {
            Self::Small => 16.0,
            Self::Medium => 24.0,
            Self::Large => 32.0,
            Self::XLarge => 42.0,
        }
    }

    /// Display name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
            Self::XLarge => "X-Large",
        }
    }

    /// Map a stored pixel size back to its preset, if it is one.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn from_px(px: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.px() == px)
    }
}

impl std::str::FromStr for TextSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "x-large" => Ok(Self::XLarge),
            other => Err(format!("unknown text size: {other}")),
        }
    }
}

/// An overlay text item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Identifier, unique within the slide.
    pub id: ElementId,
    /// Free text; may contain explicit line breaks.
    pub text: String,
    /// Stored colour. The editor always writes [`TEXT_COLOR`].
    pub color: String,
    /// Font size in authoring pixels.
    pub font_size: f32,
    /// CSS-style font family name.
    pub font_family: String,
    /// Vertical anchor.
    pub position: TextPosition,
}

impl TextElement {
    /// Create a text element with the editor's fixed colour.
    #[must_use]
    pub fn new(text: impl Into<String>, size: TextSize, position: TextPosition) -> Self {
        Self {
            id: ElementId::new(),
            text: text.into(),
            color: TEXT_COLOR.to_string(),
            font_size: size.px(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            position,
        }
    }

    /// Set the font family.
    #[must_use]
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }
}

/// A positioned image overlay, in authoring units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerElement {
    /// Identifier, unique within the slide.
    pub id: ElementId,
    /// Image source (data URI or URL).
    pub src: String,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

impl StickerElement {
    /// Create a sticker at the given box.
    #[must_use]
    pub fn new(src: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: ElementId::new(),
            src: src.into(),
            x,
            y,
            width,
            height,
        }
    }
}

/// A single carousel slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Stable identifier, assigned at creation.
    pub id: SlideId,
    /// Which background fields are meaningful.
    pub background_type: BackgroundType,
    /// Used when `background_type` is `Color` (and `Gradient`).
    pub background_color: String,
    /// Data URI or URL, used when `background_type` is `Image`.
    #[serde(default)]
    pub background_image: String,
    /// Unused gradient definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<String>,
    /// Grid cell sources; empty strings are cells with no upload yet.
    #[serde(default)]
    pub grid_images: Vec<String>,
    /// Overlay text, in append order.
    #[serde(default)]
    pub text_elements: Vec<TextElement>,
    /// Overlay images.
    #[serde(default)]
    pub sticker_elements: Vec<StickerElement>,
}

impl Slide {
    /// Create an empty white slide.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SlideId::new(),
            background_type: BackgroundType::Color,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            background_image: String::new(),
            background_gradient: None,
            grid_images: Vec::new(),
            text_elements: Vec::new(),
            sticker_elements: Vec::new(),
        }
    }

    /// Structural copy with a fresh slide id. Element ids are kept since
    /// they only need to be unique within a slide.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: SlideId::new(),
            ..self.clone()
        }
    }

    /// Grid source for a cell; `None` when the cell has no image.
    #[must_use]
    pub fn grid_image(&self, index: usize) -> Option<&str> {
        self.grid_images
            .get(index)
            .map(String::as_str)
            .filter(|src| !src.is_empty())
    }

    /// Look up a text element.
    #[must_use]
    pub fn text_element(&self, id: ElementId) -> Option<&TextElement> {
        self.text_elements.iter().find(|el| el.id == id)
    }

    /// Texts of the existing elements, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.text_elements.iter().map(|el| el.text.clone()).collect()
    }
}

impl Default for Slide {
    fn default() -> Self {
        Self::new()
    }
}
