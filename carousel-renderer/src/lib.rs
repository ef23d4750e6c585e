//! # Carousel Renderer
//!
//! Headless renderer for carousel slides. Slides never touch a browser:
//! they are laid out, written as SVG and rasterized with resvg/tiny-skia.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────┐   ┌────────────┐   ┌─────────┐   ┌────────────┐   ┌─────────┐
//! │  Slide  │──▶│ SlideLayout│──▶│   SVG   │──▶│ Rasterizer │──▶│ PNG/JPEG│
//! └─────────┘   └────────────┘   └─────────┘   └────────────┘   └────┬────┘
//!                                                                   │
//!                                                         ┌─────────▼────────┐
//!                                                         │ Archiver (zip)   │
//!                                                         └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod error;
pub mod export;
pub mod layout;
pub mod preview;
pub mod raster;
pub mod svg;
pub mod text;

pub use archive::{Archiver, ExportedFile, ZipArchiver};
pub use error::{RenderError, RenderResult};
pub use export::{BatchExport, ExportConfig, SlideExporter, SlideFailure, BATCH_ARCHIVE_NAME};
pub use layout::SlideLayout;
pub use preview::PreviewFrame;
pub use raster::{FontConfig, ImageFormat, RasterImage, Rasterizer, ResvgRasterizer};
