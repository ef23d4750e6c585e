//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering and export.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The composed SVG could not be parsed.
    #[error("SVG parsing failed: {0}")]
    Svg(String),

    /// Pixmap allocation or rasterization failed.
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// Encoding the raster to an image format failed.
    #[error("{format} encoding failed: {message}")]
    Encode {
        /// Target format.
        format: &'static str,
        /// Encoder message.
        message: String,
    },

    /// An image is referenced by path or URL instead of being embedded.
    #[error("Image is not embedded as a data URI: {0}")]
    ImageSource(String),

    /// Building the zip archive failed.
    #[error("Archive creation failed: {0}")]
    Archive(String),

    /// Export request is unusable (bad index, empty batch).
    #[error("Export failed: {0}")]
    Export(String),
}
