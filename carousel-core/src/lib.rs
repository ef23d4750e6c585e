//! # Carousel Core
//!
//! Core carousel logic: the slide model, the slide deck and its cursor,
//! the slide editor and the editing session that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               carousel-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Slide Model     │  Slide Manager           │
//! │  - Backgrounds   │  - Ordered deck          │
//! │  - Text/stickers │  - Current-slide cursor  │
//! ├─────────────────────────────────────────────┤
//! │  Slide Editor    │  Session                 │
//! │  - Pure edits    │  - Notices               │
//! │  - AI copy seam  │  - Aspect ratio/product  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rendering and export live in `carousel-renderer`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aspect;
pub mod copy;
pub mod deck;
pub mod editor;
pub mod error;
pub mod media;
pub mod notice;
pub mod session;
pub mod slide;

pub use aspect::{scale_factor, AspectRatio, AspectRatioConfig, AUTHORING_HEIGHT, AUTHORING_WIDTH};
pub use copy::{CopyGenerator, CopyRequest, CopyResponse, ProductBrief};
pub use deck::{DeckDocument, SlideDeck};
pub use editor::SlideEditor;
pub use error::{CarouselError, CarouselResult};
pub use media::{data_uri_from_bytes, read_image_file, MediaType};
pub use notice::{Notice, NoticeLevel};
pub use session::CarouselSession;
pub use slide::{
    BackgroundType, ElementId, GridLayout, Slide, SlideId, StickerElement, TextElement,
    TextPosition, TextSize, DEFAULT_BACKGROUND_COLOR, DEFAULT_FONT_FAMILY, TEXT_COLOR,
};

/// Carousel core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
