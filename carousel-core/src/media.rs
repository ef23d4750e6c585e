//! Image uploads as data URIs.
//!
//! Uploaded images are never sent anywhere; they are embedded straight into
//! the slide model so the exporter can rasterize them without fetching.

use std::path::Path;

use base64::Engine;

use crate::{CarouselError, CarouselResult};

/// Image types accepted for backgrounds, grid cells and stickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// PNG.
    Png,
    /// JPEG.
    Jpeg,
    /// GIF.
    Gif,
    /// WebP.
    WebP,
}

impl MediaType {
    /// Detect the type from magic bytes.
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(Self::WebP)
        } else {
            None
        }
    }

    /// MIME type string.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }
}

/// Encode image bytes as a base64 data URI.
///
/// # Errors
///
/// Returns [`CarouselError::UnsupportedImage`] if the bytes are not a PNG,
/// JPEG, GIF or WebP image.
pub fn data_uri_from_bytes(data: &[u8]) -> CarouselResult<String> {
    let media = MediaType::sniff(data).ok_or_else(|| {
        CarouselError::UnsupportedImage("expected PNG, JPEG, GIF or WebP data".to_string())
    })?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    Ok(format!("data:{};base64,{encoded}", media.mime()))
}

/// Read an image file into a data URI.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a supported image.
pub fn read_image_file(path: impl AsRef<Path>) -> CarouselResult<String> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "Read image file");
    data_uri_from_bytes(&data)
}
