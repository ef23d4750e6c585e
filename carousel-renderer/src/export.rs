//! Slide export.
//!
//! Two paths share one layout engine:
//!
//! - **Single slide**: the preview frame is rasterized at
//!   [`ExportConfig::preview_scale`] (2x by default).
//! - **Batch**: every slide is laid out at the aspect ratio's exact export
//!   size, rasterized at [`ExportConfig::batch_scale`] (1x) and packed into
//!   one archive. A slide that fails to render is recorded and skipped; the
//!   remaining slides are still exported.
//!
//! Images must be embedded as `data:` URIs. A slide that references an image
//! by path or URL fails to export instead of rendering without it.

use std::time::Instant;

use carousel_core::{AspectRatio, Notice, Slide};

use crate::archive::{Archiver, ExportedFile, ZipArchiver};
use crate::error::{RenderError, RenderResult};
use crate::layout::SlideLayout;
use crate::preview::PreviewFrame;
use crate::raster::{
    is_embedded, source_label, FontConfig, ImageFormat, Rasterizer, ResvgRasterizer,
};
use crate::svg::render_svg;

/// File name of the batch archive.
pub const BATCH_ARCHIVE_NAME: &str = "all-slides.zip";

/// Configuration for slide export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Image format of each slide.
    pub format: ImageFormat,
    /// JPEG quality 1-100.
    pub jpeg_quality: u8,
    /// Capture scale of single-slide export, applied to the preview size.
    pub preview_scale: f32,
    /// Capture scale of batch export, applied to the export size.
    pub batch_scale: f32,
    /// Base fill behind every slide (RGB).
    pub background: [u8; 3],
    /// Font sources.
    pub fonts: FontConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            jpeg_quality: 92,
            preview_scale: 2.0,
            batch_scale: 1.0,
            background: [255, 255, 255],
            fonts: FontConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Base fill as a CSS hex colour.
    #[must_use]
    pub fn background_hex(&self) -> String {
        let [r, g, b] = self.background;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// A slide that could not be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideFailure {
    /// Zero-based slide index.
    pub index: usize,
    /// What went wrong.
    pub message: String,
}

/// Outcome of a batch export.
#[derive(Debug, Clone)]
pub struct BatchExport {
    /// The archive.
    pub archive: ExportedFile,
    /// Names of the files inside the archive, in slide order.
    pub exported: Vec<String>,
    /// Slides left out of the archive.
    pub failures: Vec<SlideFailure>,
}

impl BatchExport {
    /// Number of slides in the archive.
    #[must_use]
    pub fn exported_count(&self) -> usize {
        self.exported.len()
    }

    /// Number of slides that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// End-of-batch message.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} slides have been packaged into a zip file.",
            self.exported_count()
        );
        if !self.failures.is_empty() {
            summary.push_str(&format!(
                " ({} slides could not be processed)",
                self.failed_count()
            ));
        }
        summary
    }

    /// End-of-batch notice.
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice::success("Download complete", self.summary())
    }
}

/// Notice shown when a batch starts.
#[must_use]
pub fn batch_started_notice() -> Notice {
    Notice::info("Preparing download", "Creating zip file with all slides...")
}

/// Notice shown when a batch could not be packaged.
#[must_use]
pub fn batch_failed_notice() -> Notice {
    Notice::error(
        "Download failed",
        "An error occurred while creating the zip file.",
    )
}

/// Notice shown when a single-slide export starts.
#[must_use]
pub fn slide_started_notice() -> Notice {
    Notice::info("Preparing download", "Generating image...")
}

/// Notice shown when a single slide was exported.
#[must_use]
pub fn slide_exported_notice(index: usize) -> Notice {
    Notice::success(
        "Download complete",
        format!("Slide {} has been downloaded.", index + 1),
    )
}

/// Notice shown when a single-slide export failed.
#[must_use]
pub fn slide_failed_notice() -> Notice {
    Notice::error(
        "Download failed",
        "An error occurred while downloading the slide.",
    )
}

/// Exports slides to images and archives.
pub struct SlideExporter {
    config: ExportConfig,
    rasterizer: Box<dyn Rasterizer>,
    archiver: Box<dyn Archiver>,
}

impl SlideExporter {
    /// Create an exporter using resvg and zip.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let rasterizer = ResvgRasterizer::new(&config.fonts);
        Self::with_backends(config, Box::new(rasterizer), Box::new(ZipArchiver))
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Create an exporter with explicit rasterizer and archiver.
    #[must_use]
    pub fn with_backends(
        config: ExportConfig,
        rasterizer: Box<dyn Rasterizer>,
        archiver: Box<dyn Archiver>,
    ) -> Self {
        Self {
            config,
            rasterizer,
            archiver,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// File name for the slide at zero-based `index`.
    #[must_use]
    pub fn slide_file_name(&self, index: usize) -> String {
        format!("slide-{}.{}", index + 1, self.config.format.extension())
    }

    /// SVG of the preview frame.
    #[must_use]
    pub fn preview_svg(&self, slide: &Slide, aspect_ratio: AspectRatio) -> String {
        PreviewFrame::new(slide, aspect_ratio).to_svg(&self.config.background_hex())
    }

    /// SVG of the slide at the aspect ratio's export size.
    #[must_use]
    pub fn slide_svg(&self, slide: &Slide, aspect_ratio: AspectRatio) -> String {
        let config = aspect_ratio.config();
        let layout = SlideLayout::compute(slide, config.width, config.height);
        render_svg(&layout, &self.config.background_hex())
    }

    /// Export the previewed slide at the preview capture scale.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ImageSource`] if an image is not embedded, or an
    /// error if rasterization or encoding fails.
    #[tracing::instrument(skip(self, slide), fields(slide = %slide.id))]
    pub fn export_slide(
        &self,
        slide: &Slide,
        index: usize,
        aspect_ratio: AspectRatio,
    ) -> RenderResult<ExportedFile> {
        let frame = PreviewFrame::new(slide, aspect_ratio);
        ensure_embedded(&frame.layout)?;
        let svg = frame.to_svg(&self.config.background_hex());
        let data = self.rasterize(&svg, self.config.preview_scale)?;
        tracing::info!(bytes = data.len(), "Exported slide");
        Ok(ExportedFile {
            name: self.slide_file_name(index),
            mime: self.config.format.mime(),
            data,
        })
    }

    /// Render one slide for a batch, without the file wrapper.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ImageSource`] if an image is not embedded, or an
    /// error if rasterization or encoding fails.
    pub fn render_slide(&self, slide: &Slide, aspect_ratio: AspectRatio) -> RenderResult<Vec<u8>> {
        let config = aspect_ratio.config();
        let layout = SlideLayout::compute(slide, config.width, config.height);
        ensure_embedded(&layout)?;
        let svg = render_svg(&layout, &self.config.background_hex());
        self.rasterize(&svg, self.config.batch_scale)
    }

    /// Export every slide into one archive.
    ///
    /// Slides are rendered one at a time in order. A per-slide failure is
    /// logged and recorded in [`BatchExport::failures`]; it never stops the
    /// batch.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] for an empty slide list, or
    /// [`RenderError::Archive`] if the archive cannot be written.
    #[tracing::instrument(skip(self, slides), fields(slides = slides.len()))]
    pub fn export_all(
        &self,
        slides: &[Slide],
        aspect_ratio: AspectRatio,
    ) -> RenderResult<BatchExport> {
        if slides.is_empty() {
            return Err(RenderError::Export("no slides to export".to_string()));
        }
        let started = Instant::now();

        let (files, failures) = slides.iter().enumerate().fold(
            (Vec::with_capacity(slides.len()), Vec::new()),
            |(mut files, mut failures), (index, slide)| {
                match self.render_slide(slide, aspect_ratio) {
                    Ok(data) => files.push(ExportedFile {
                        name: self.slide_file_name(index),
                        mime: self.config.format.mime(),
                        data,
                    }),
                    Err(e) => {
                        tracing::warn!(index, slide = %slide.id, error = %e, "Error processing slide");
                        failures.push(SlideFailure {
                            index,
                            message: e.to_string(),
                        });
                    }
                }
                (files, failures)
            },
        );

        let data = self.archiver.archive(&files).inspect_err(|e| {
            tracing::error!(error = %e, "Error creating zip file");
        })?;

        let batch = BatchExport {
            archive: ExportedFile {
                name: BATCH_ARCHIVE_NAME.to_string(),
                mime: self.archiver.mime(),
                data,
            },
            exported: files.into_iter().map(|f| f.name).collect(),
            failures,
        };
        tracing::info!(
            exported = batch.exported_count(),
            failed = batch.failed_count(),
            elapsed_ms = started.elapsed().as_millis(),
            "Batch export complete"
        );
        Ok(batch)
    }

    fn rasterize(&self, svg: &str, scale: f32) -> RenderResult<Vec<u8>> {
        self.rasterizer.rasterize(svg, scale)?.encode(
            self.config.format,
            self.config.background,
            self.config.jpeg_quality,
        )
    }
}

fn ensure_embedded(layout: &SlideLayout) -> RenderResult<()> {
    match layout.image_sources().into_iter().find(|src| !is_embedded(src)) {
        Some(src) => Err(RenderError::ImageSource(source_label(src))),
        None => Ok(()),
    }
}

impl std::fmt::Debug for SlideExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideExporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::{TextElement, TextPosition, TextSize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn exporter() -> SlideExporter {
        SlideExporter::new(ExportConfig {
            fonts: FontConfig {
                system_fonts: false,
                font_dirs: Vec::new(),
            },
            ..ExportConfig::default()
        })
    }

    /// Delegates to resvg but fails on the listed call numbers.
    struct Flaky {
        inner: ResvgRasterizer,
        fail_on: Vec<usize>,
        calls: Arc<AtomicUsize>,
    }

    impl Rasterizer for Flaky {
        fn rasterize(&self, svg: &str, scale: f32) -> RenderResult<crate::raster::RasterImage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&call) {
                return Err(RenderError::Raster("capture failed".into()));
            }
            self.inner.rasterize(svg, scale)
        }
    }

    fn flaky_exporter(fail_on: Vec<usize>) -> (SlideExporter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let rasterizer = Flaky {
            inner: ResvgRasterizer::new(&FontConfig {
                system_fonts: false,
                font_dirs: Vec::new(),
            }),
            fail_on,
            calls: Arc::clone(&calls),
        };
        let exporter = SlideExporter::with_backends(
            ExportConfig::default(),
            Box::new(rasterizer),
            Box::new(ZipArchiver),
        );
        (exporter, calls)
    }

    struct BrokenArchiver;

    impl Archiver for BrokenArchiver {
        fn mime(&self) -> &'static str {
            "application/zip"
        }

        fn archive(&self, _files: &[ExportedFile]) -> RenderResult<Vec<u8>> {
            Err(RenderError::Archive("disk full".into()))
        }
    }

    #[test]
    fn test_single_slide_is_preview_at_2x() {
        let file = exporter()
            .export_slide(&Slide::new(), 0, AspectRatio::Story)
            .expect("export");
        assert_eq!(file.name, "slide-1.png");
        assert_eq!(file.mime, "image/png");
        assert_eq!(&file.data[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_batch_continues_past_failures() {
        let slides = vec![Slide::new(), Slide::new(), Slide::new()];
        let (exporter, calls) = flaky_exporter(vec![1]);

        let batch = exporter
            .export_all(&slides, AspectRatio::Square)
            .expect("batch");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(batch.exported, vec!["slide-1.png", "slide-3.png"]);
        assert_eq!(
            batch.failures,
            vec![SlideFailure {
                index: 1,
                message: "Rasterization failed: capture failed".into()
            }]
        );
        assert_eq!(batch.archive.name, "all-slides.zip");
        assert_eq!(
            batch.summary(),
            "2 slides have been packaged into a zip file. (1 slides could not be processed)"
        );
    }

    #[test]
    fn test_batch_all_failed_still_archives() {
        let (exporter, _) = flaky_exporter(vec![0, 1]);
        let batch = exporter
            .export_all(&[Slide::new(), Slide::new()], AspectRatio::Story)
            .expect("batch");
        assert_eq!(batch.exported_count(), 0);
        assert_eq!(batch.failed_count(), 2);
    }

    #[test]
    fn test_batch_summary_without_failures() {
        let batch = exporter()
            .export_all(&[Slide::new()], AspectRatio::Landscape)
            .expect("batch");
        assert_eq!(batch.summary(), "1 slides have been packaged into a zip file.");
        assert_eq!(batch.notice().title, "Download complete");
    }

    #[test]
    fn test_archive_failure_aborts() {
        let exporter = SlideExporter::with_backends(
            ExportConfig::default(),
            Box::new(ResvgRasterizer::new(&FontConfig {
                system_fonts: false,
                font_dirs: Vec::new(),
            })),
            Box::new(BrokenArchiver),
        );
        let err = exporter
            .export_all(&[Slide::new()], AspectRatio::Story)
            .unwrap_err();
        assert!(matches!(err, RenderError::Archive(_)));
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(matches!(
            exporter().export_all(&[], AspectRatio::Story),
            Err(RenderError::Export(_))
        ));
    }

    #[test]
    fn test_slide_svg_uses_export_size() {
        let mut slide = Slide::new();
        slide
            .text_elements
            .push(TextElement::new("Hi", TextSize::XLarge, TextPosition::Top));
        let svg = exporter().slide_svg(&slide, AspectRatio::Landscape);
        assert!(svg.contains("width=\"1920\" height=\"1080\""));
        assert!(svg.contains("font-size=\"23.625\""));
    }

    #[test]
    fn test_jpeg_file_names() {
        let exporter = SlideExporter::new(ExportConfig {
            format: ImageFormat::Jpeg,
            fonts: FontConfig {
                system_fonts: false,
                font_dirs: Vec::new(),
            },
            ..ExportConfig::default()
        });
        assert_eq!(exporter.slide_file_name(4), "slide-5.jpg");
        let file = exporter
            .export_slide(&Slide::new(), 4, AspectRatio::Square)
            .expect("jpeg");
        assert_eq!(&file.data[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_background_hex() {
        assert_eq!(ExportConfig::default().background_hex(), "#ffffff");
    }
}
