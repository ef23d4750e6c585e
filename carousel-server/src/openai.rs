//! Client for an OpenAI-compatible chat completions API.
//!
//! Wraps the two completions the server needs: one line of slide copy and a
//! list of hooks. Prompts live in [`crate::prompts`].

use std::sync::Arc;

use async_trait::async_trait;
use carousel_core::{CarouselError, CarouselResult, CopyGenerator, CopyRequest, ProductBrief};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::prompts::{
    self, Sampling, CAROUSEL_TEXT_SAMPLING, CAROUSEL_TEXT_SYSTEM_PROMPT, HOOKS_SAMPLING,
    HOOKS_SYSTEM_PROMPT,
};

/// Errors that can occur when talking to the completions API.
#[derive(Debug, Error)]
pub enum CopywriterError {
    /// The configured base URL is invalid.
    #[error("invalid OpenAI base URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, body decoding).
    #[error("OpenAI request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("OpenAI API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as sent.
        body: String,
    },
    /// The completion carried no text.
    #[error("OpenAI returned an empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

/// Chat completions client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    inner: Arc<Inner>,
}

impl OpenAiClient {
    /// Create a client for `base_url` (for example `https://api.openai.com/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`CopywriterError::InvalidUrl`] if the URL cannot be parsed and
    /// [`CopywriterError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, CopywriterError> {
        let mut base =
            Url::parse(base_url).map_err(|e| CopywriterError::InvalidUrl(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join("chat/completions")
            .map_err(|e| CopywriterError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .user_agent(concat!("carousel-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                endpoint,
                api_key: api_key.to_string(),
                model: model.to_string(),
            }),
        })
    }

    /// Completions endpoint in use.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Model in use.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Generate one piece of slide copy, trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the completion is empty.
    pub async fn carousel_text(&self, request: &CopyRequest) -> Result<String, CopywriterError> {
        let prompt = prompts::carousel_text_prompt(request);
        let content = self
            .complete(CAROUSEL_TEXT_SYSTEM_PROMPT, &prompt, CAROUSEL_TEXT_SAMPLING)
            .await?;
        let text = content.trim();
        if text.is_empty() {
            return Err(CopywriterError::EmptyCompletion);
        }
        Ok(text.to_string())
    }

    /// Generate up to `count` hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn hooks(
        &self,
        product: &ProductBrief,
        count: usize,
    ) -> Result<Vec<String>, CopywriterError> {
        let prompt = prompts::hooks_prompt(product, count);
        let content = self
            .complete(HOOKS_SYSTEM_PROMPT, &prompt, HOOKS_SAMPLING)
            .await?;
        Ok(prompts::parse_hooks(&content, count))
    }

    /// Run one chat completion and return the first choice's content.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        sampling: Sampling,
    ) -> Result<String, CopywriterError> {
        let body = ChatCompletionRequest {
            model: &self.inner.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            presence_penalty: sampling.presence_penalty,
            frequency_penalty: sampling.frequency_penalty,
        };

        debug!(model = %self.inner.model, "requesting chat completion");
        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .bearer_auth(&self.inner.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat completion rejected");
            return Err(CopywriterError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(CopywriterError::EmptyCompletion)
    }
}

#[async_trait]
impl CopyGenerator for OpenAiClient {
    async fn generate(&self, request: &CopyRequest) -> CarouselResult<String> {
        self.carousel_text(request)
            .await
            .map_err(|e| CarouselError::Generation(e.to_string()))
    }
}
