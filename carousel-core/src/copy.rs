//! Contract with the text-generation collaborator.
//!
//! The editor asks for one line of slide copy at a time. What produces it
//! (an HTTP service, an LLM client, a test double) sits behind
//! [`CopyGenerator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{CarouselError, CarouselResult};

/// Product the carousel is about. Field names follow the product records
/// the dashboard sends, so they are kept in snake case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductBrief {
    /// Product/app name.
    pub app_name: String,
    /// One-line pitch.
    pub short_description: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    /// Who the product is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    /// Core value proposition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_proposition: Option<String>,
    /// Social media strategy notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_strategy: Option<String>,
    /// JSON-encoded list of reference hooks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_hooks: Option<String>,
    /// JSON-encoded list of hashtags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_hashtags: Option<String>,
}

impl ProductBrief {
    /// Create a brief with the two required fields.
    #[must_use]
    pub fn new(app_name: impl Into<String>, short_description: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            short_description: short_description.into(),
            ..Self::default()
        }
    }
}

/// Request for one line of copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    /// The product.
    pub product: ProductBrief,
    /// 1-based ordinal among the slide's own text elements.
    pub slide_number: usize,
    /// Texts already on the slide, for narrative context.
    #[serde(default)]
    pub existing_texts: Vec<String>,
}

/// Wire response of the copy service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResponse {
    /// Whether generation succeeded.
    pub success: bool,
    /// Generated copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CopyResponse {
    /// Extract usable copy: trimmed and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::Generation`] carrying the service message
    /// (or a generic one) when the response has no usable text.
    pub fn into_text(self) -> CarouselResult<String> {
        let text = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        match (self.success, text) {
            (true, Some(text)) => Ok(text),
            _ => Err(CarouselError::Generation(
                self.message
                    .unwrap_or_else(|| "Failed to generate text".to_string()),
            )),
        }
    }
}

/// Produces a single suggestion string for a slide.
#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Generate one line of copy.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::Generation`] with a user-facing message when
    /// the collaborator is unreachable or reports failure.
    async fn generate(&self, request: &CopyRequest) -> CarouselResult<String>;
}
