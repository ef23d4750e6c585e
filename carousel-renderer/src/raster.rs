//! SVG rasterization and image encoding.

use std::path::PathBuf;
use std::sync::Arc;

use image::ImageEncoder;

use crate::error::{RenderError, RenderResult};

/// Raster output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image.
    Jpeg,
}

impl ImageFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Font sources for text rendering.
#[derive(Debug, Clone)]
pub struct FontConfig {
    /// Load the fonts installed on the host.
    pub system_fonts: bool,
    /// Additional directories to scan for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            system_fonts: true,
            font_dirs: Vec::new(),
        }
    }
}

/// A rasterized slide.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: tiny_skia::Pixmap,
}

impl RasterImage {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap.encode_png().map_err(|e| RenderError::Encode {
            format: "PNG",
            message: e.to_string(),
        })
    }

    /// Encode as JPEG, compositing transparent pixels over `background`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_jpeg(&self, background: [u8; 3], quality: u8) -> RenderResult<Vec<u8>> {
        let (width, height) = (self.width(), self.height());
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        // Pixmap data is premultiplied.
        for pixel in self.pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            for channel in 0..3 {
                let value = f32::from(background[channel]).mul_add(inv, f32::from(pixel[channel]));
                rgb_data.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Encode {
                format: "JPEG",
                message: e.to_string(),
            })?;

        Ok(buf.into_inner())
    }

    /// Encode in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode(
        &self,
        format: ImageFormat,
        background: [u8; 3],
        quality: u8,
    ) -> RenderResult<Vec<u8>> {
        match format {
            ImageFormat::Png => self.to_png(),
            ImageFormat::Jpeg => self.to_jpeg(background, quality),
        }
    }
}

/// Whether `href` is an embedded `data:` URI.
#[must_use]
pub fn is_embedded(href: &str) -> bool {
    href.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Shortened form of an image reference for logs and error messages.
#[must_use]
pub fn source_label(href: &str) -> String {
    const MAX_CHARS: usize = 64;
    match href.char_indices().nth(MAX_CHARS) {
        Some((end, _)) => format!("{}...", &href[..end]),
        None => href.to_string(),
    }
}

/// Decodes `data:` images and refuses everything else, so a path or URL in
/// a slide never reaches the filesystem.
fn embedded_only_resolver() -> usvg::ImageHrefResolver<'static> {
    usvg::ImageHrefResolver {
        resolve_data: usvg::ImageHrefResolver::default_data_resolver(),
        resolve_string: Box::new(|href: &str, _: &usvg::Options| {
            tracing::warn!(href = %source_label(href), "Ignoring image that is not embedded");
            None
        }),
    }
}

/// Turns an SVG document into pixels.
pub trait Rasterizer: Send + Sync {
    /// Rasterize `svg` at `scale` times its declared size.
    ///
    /// # Errors
    ///
    /// Returns an error if the SVG cannot be parsed or the pixmap cannot be
    /// allocated.
    fn rasterize(&self, svg: &str, scale: f32) -> RenderResult<RasterImage>;
}

/// [`Rasterizer`] backed by resvg and tiny-skia.
///
/// The font database is loaded once and shared by every render.
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    /// Build a rasterizer, loading fonts as configured.
    #[must_use]
    pub fn new(fonts: &FontConfig) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if fonts.system_fonts {
            db.load_system_fonts();
        }
        for dir in &fonts.font_dirs {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "Loaded font database");
        Self {
            fontdb: Arc::new(db),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new(&FontConfig::default())
    }
}

impl std::fmt::Debug for ResvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer for ResvgRasterizer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, svg: &str, scale: f32) -> RenderResult<RasterImage> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderError::Raster(format!("invalid scale {scale}")));
        }

        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            image_href_resolver: embedded_only_resolver(),
            ..usvg::Options::default()
        };
        let tree =
            usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

        let px_w = (tree.size().width() * scale).round() as u32;
        let px_h = (tree.size().height() * scale).round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1)).ok_or_else(|| {
            RenderError::Raster(format!("cannot allocate {px_w}x{px_h} pixmap"))
        })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        Ok(RasterImage { pixmap })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rasterizer() -> ResvgRasterizer {
        ResvgRasterizer::new(&FontConfig {
            system_fonts: false,
            font_dirs: Vec::new(),
        })
    }

    const RED_SQUARE: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"20\" viewBox=\"0 0 10 20\"><rect width=\"10\" height=\"20\" fill=\"#ff0000\"/></svg>";

    #[test]
    fn test_rasterize_scales_pixels() {
        let image = rasterizer().rasterize(RED_SQUARE, 2.0).expect("raster");
        assert_eq!((image.width(), image.height()), (20, 40));
    }

    #[test]
    fn test_png_and_jpeg_magic() {
        let image = rasterizer().rasterize(RED_SQUARE, 1.0).expect("raster");

        let png = image.encode(ImageFormat::Png, [255, 255, 255], 92).expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);

        let jpeg = image.encode(ImageFormat::Jpeg, [255, 255, 255], 92).expect("jpeg");
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_invalid_svg_is_an_error() {
        let err = rasterizer().rasterize("not svg", 1.0).unwrap_err();
        assert!(matches!(err, RenderError::Svg(_)));
    }

    #[test]
    fn test_invalid_scale_is_an_error() {
        assert!(rasterizer().rasterize(RED_SQUARE, 0.0).is_err());
        assert!(rasterizer().rasterize(RED_SQUARE, f32::NAN).is_err());
    }

    #[test]
    fn test_embedded_detection() {
        assert!(is_embedded("data:image/png;base64,AA=="));
        assert!(is_embedded("DATA:image/png;base64,AA=="));
        assert!(!is_embedded("/etc/passwd"));
        assert!(!is_embedded("https://example.com/bg.png"));
        assert!(!is_embedded("bg.png"));
        assert!(!is_embedded(""));
    }

    #[test]
    fn test_source_label_truncates() {
        assert_eq!(source_label("a.png"), "a.png");
        let long = "x".repeat(100);
        assert_eq!(source_label(&long), format!("{}...", "x".repeat(64)));
    }

    #[test]
    fn test_path_href_is_not_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("red.png");
        let red = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
        red.save(&path).expect("write png");

        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"8\" height=\"8\" viewBox=\"0 0 8 8\"><image width=\"8\" height=\"8\" xlink:href=\"{}\"/></svg>",
            path.display()
        );
        let image = rasterizer().rasterize(&svg, 1.0).expect("raster");
        assert!(image.pixmap.data().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpeg.mime(), "image/jpeg");
    }
}
