//! Export aspect ratios.
//!
//! Slides are authored against a fixed 1080x1920 virtual canvas. Choosing an
//! aspect ratio never changes that coordinate space, only the pixel size of
//! the exported image and therefore the scale applied at export time.

use serde::{Deserialize, Serialize};

/// Width of the authoring canvas.
pub const AUTHORING_WIDTH: f32 = 1080.0;

/// Height of the authoring canvas.
pub const AUTHORING_HEIGHT: f32 = 1920.0;

/// Named export aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Stories/Reels, 1080x1920.
    #[default]
    #[serde(rename = "9:16")]
    Story,
    /// Square posts, 1080x1080.
    #[serde(rename = "1:1")]
    Square,
    /// Portrait posts, 1080x1350.
    #[serde(rename = "4:5")]
    Portrait,
    /// Landscape, 1920x1080.
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    /// All presets in menu order.
    pub const ALL: [Self; 4] = [Self::Story, Self::Square, Self::Portrait, Self::Landscape];

    /// The `w:h` tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => "9:16",
            Self::Square => "1:1",
            Self::Portrait => "4:5",
            Self::Landscape => "16:9",
        }
    }

    /// Export configuration for this ratio.
    #[must_use]
    pub fn config(self) -> AspectRatioConfig {
        match self {
            Self::Story => AspectRatioConfig {
                ratio: self,
                width: 1080,
                height: 1920,
                label: "Stories/Reels (9:16)",
                description: "TikTok, Instagram Stories, YouTube Shorts",
            },
            Self::Square => AspectRatioConfig {
                ratio: self,
                width: 1080,
                height: 1080,
                label: "Square (1:1)",
                description: "Instagram Posts, Facebook Posts",
            },
            Self::Portrait => AspectRatioConfig {
                ratio: self,
                width: 1080,
                height: 1350,
                label: "Portrait (4:5)",
                description: "Instagram Portrait Posts",
            },
            Self::Landscape => AspectRatioConfig {
                ratio: self,
                width: 1920,
                height: 1080,
                label: "Landscape (16:9)",
                description: "YouTube, LinkedIn, Twitter",
            },
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or_else(|| format!("unknown aspect ratio: {s} (expected 9:16, 1:1, 4:5 or 16:9)"))
    }
}

/// Export pixel dimensions for a named aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectRatioConfig {
    /// Which preset this is.
    pub ratio: AspectRatio,
    /// Export width in pixels.
    pub width: u32,
    /// Export height in pixels.
    pub height: u32,
    /// Menu label.
    pub label: &'static str,
    /// Platforms the ratio targets.
    pub description: &'static str,
}

impl AspectRatioConfig {
    /// Scale from authoring units to export pixels.
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        scale_factor(self.width, self.height)
    }
}

/// `min(width / 1080, height / 1920)`.
///
/// Applied uniformly to font sizes, sticker geometry and text offsets so
/// relative layout survives across aspect ratios sharing the same origin.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scale_factor(width: u32, height: u32) -> f32 {
    (width as f32 / AUTHORING_WIDTH).min(height as f32 / AUTHORING_HEIGHT)
}
