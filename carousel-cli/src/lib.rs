//! # Carousel CLI
//!
//! Command-line host for carousel deck files.
//!
//! A deck file is the JSON form of a deck (`{ "aspectRatio": ..., "slides": [...] }`).
//! Every editing command loads it into a session, applies one action and
//! writes it back; rejected actions print their notice and leave the file
//! untouched.
//!
//! ## Usage
//!
//! ```bash
//! carousel new deck.json --aspect-ratio 1:1
//! carousel add-text deck.json "Stop scrolling" --size large --position top
//! carousel suggest deck.json --product product.json --add
//! carousel export deck.json --out all-slides.zip
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod commands;
mod copy_client;

pub use commands::run;
pub use copy_client::{CopyClientError, HttpCopyClient, DEFAULT_SERVER_URL, UNREACHABLE_MESSAGE};

use std::path::PathBuf;

use carousel_core::{AspectRatio, BackgroundType, TextPosition, TextSize};
use carousel_renderer::{ExportConfig, FontConfig};
use clap::{ArgAction, Parser, Subcommand};

/// Command-line arguments for carousel.
#[derive(Debug, Clone, Parser)]
#[command(name = "carousel")]
#[command(about = "Edit and export carousel decks")]
#[command(version)]
pub struct CliArgs {
    /// Load host fonts for text rendering
    #[arg(long, global = true, env = "CAROUSEL_SYSTEM_FONTS", default_value_t = true, action = ArgAction::Set)]
    pub system_fonts: bool,

    /// Extra font directory (repeatable)
    #[arg(long = "font-dir", global = true)]
    pub font_dirs: Vec<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Export configuration from the font options.
    #[must_use]
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            fonts: FontConfig {
                system_fonts: self.system_fonts,
                font_dirs: self.font_dirs.clone(),
            },
            ..ExportConfig::default()
        }
    }
}

/// Subcommands. Slide and element numbers are 1-based.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a deck file with one blank slide
    New {
        /// Deck file to create
        deck: PathBuf,
        /// Export aspect ratio (9:16, 1:1, 4:5, 16:9)
        #[arg(long, default_value = "9:16")]
        aspect_ratio: AspectRatio,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Duplicate a slide; the copy lands right after it
    AddSlide {
        /// Deck file
        deck: PathBuf,
        /// Slide to duplicate
        #[arg(long, default_value_t = 1)]
        slide: usize,
    },
    /// Delete a slide (the last one cannot be deleted)
    DeleteSlide {
        /// Deck file
        deck: PathBuf,
        /// Slide to delete
        slide: usize,
    },
    /// Change a slide's background
    Background {
        /// Deck file
        deck: PathBuf,
        /// Slide to edit
        #[arg(long, default_value_t = 1)]
        slide: usize,
        /// Background type (color, image, gradient, grid-2x2, grid-2x1, grid-1x2, grid-3x3)
        #[arg(long = "type")]
        background_type: Option<BackgroundType>,
        /// Background color (CSS hex)
        #[arg(long)]
        color: Option<String>,
    },
    /// Embed an image file as the background or a grid cell
    SetImage {
        /// Deck file
        deck: PathBuf,
        /// PNG, JPEG, GIF or WebP file
        image: PathBuf,
        /// Slide to edit
        #[arg(long, default_value_t = 1)]
        slide: usize,
        /// Grid cell to fill instead of the background
        #[arg(long)]
        cell: Option<usize>,
    },
    /// Add a text element
    AddText {
        /// Deck file
        deck: PathBuf,
        /// Text; may contain line breaks
        text: String,
        /// Slide to edit
        #[arg(long, default_value_t = 1)]
        slide: usize,
        /// Text size (small, medium, large, x-large)
        #[arg(long, default_value = "medium")]
        size: TextSize,
        /// Vertical anchor (top, center, bottom)
        #[arg(long, default_value = "center")]
        position: TextPosition,
    },
    /// Remove a text element
    RemoveText {
        /// Deck file
        deck: PathBuf,
        /// Text element to remove
        element: usize,
        /// Slide to edit
        #[arg(long, default_value_t = 1)]
        slide: usize,
    },
    /// Place an image file as a sticker
    AddSticker {
        /// Deck file
        deck: PathBuf,
        /// PNG, JPEG, GIF or WebP file
        image: PathBuf,
        /// Slide to edit
        #[arg(long, default_value_t = 1)]
        slide: usize,
        /// Left edge in authoring pixels
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        /// Top edge in authoring pixels
        #[arg(long, default_value_t = 0.0)]
        y: f32,
        /// Width in authoring pixels
        #[arg(long, default_value_t = 100.0)]
        width: f32,
        /// Height in authoring pixels
        #[arg(long, default_value_t = 100.0)]
        height: f32,
    },
    /// Ask the copy service for text for a slide
    Suggest {
        /// Deck file
        deck: PathBuf,
        /// Product JSON file
        #[arg(long)]
        product: PathBuf,
        /// Slide to write for
        #[arg(long, default_value_t = 1)]
        slide: usize,
        /// Copy server base URL
        #[arg(long, env = "CAROUSEL_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
        server_url: String,
        /// Add the suggestion to the slide
        #[arg(long)]
        add: bool,
        /// Text size when adding
        #[arg(long, default_value = "medium")]
        size: TextSize,
        /// Vertical anchor when adding
        #[arg(long, default_value = "center")]
        position: TextPosition,
    },
    /// Export every slide into a zip
    Export {
        /// Deck file
        deck: PathBuf,
        /// Output archive
        #[arg(long, default_value = carousel_renderer::BATCH_ARCHIVE_NAME)]
        out: PathBuf,
        /// Override the deck's aspect ratio
        #[arg(long)]
        aspect_ratio: Option<AspectRatio>,
    },
    /// Export one slide as PNG at preview scale
    ExportSlide {
        /// Deck file
        deck: PathBuf,
        /// Slide to export
        #[arg(long, default_value_t = 1)]
        slide: usize,
        /// Output file (default slide-N.png)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Override the deck's aspect ratio
        #[arg(long)]
        aspect_ratio: Option<AspectRatio>,
    },
    /// List the aspect-ratio presets
    Ratios,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_defaults() {
        let args = CliArgs::try_parse_from(["carousel", "export", "deck.json"]).expect("parse");
        let Command::Export {
            out, aspect_ratio, ..
        } = args.command
        else {
            panic!("expected export");
        };
        assert_eq!(out, PathBuf::from("all-slides.zip"));
        assert!(aspect_ratio.is_none());
    }

    #[test]
    fn parses_text_options() {
        let args = CliArgs::try_parse_from([
            "carousel",
            "add-text",
            "deck.json",
            "Hello",
            "--size",
            "x-large",
            "--position",
            "bottom",
            "--slide",
            "2",
        ])
        .expect("parse");
        let Command::AddText {
            size,
            position,
            slide,
            ..
        } = args.command
        else {
            panic!("expected add-text");
        };
        assert_eq!(size, TextSize::XLarge);
        assert_eq!(position, TextPosition::Bottom);
        assert_eq!(slide, 2);
    }

    #[test]
    fn rejects_unknown_ratio() {
        assert!(
            CliArgs::try_parse_from(["carousel", "new", "d.json", "--aspect-ratio", "3:2"])
                .is_err()
        );
    }

    #[test]
    fn font_flags_are_global() {
        let args = CliArgs::try_parse_from([
            "carousel",
            "ratios",
            "--system-fonts",
            "false",
            "--font-dir",
            "/fonts",
        ])
        .expect("parse");
        let config = args.export_config();
        assert!(!config.fonts.system_fonts);
        assert_eq!(config.fonts.font_dirs, vec![PathBuf::from("/fonts")]);
    }
}
