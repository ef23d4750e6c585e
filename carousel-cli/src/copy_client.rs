//! HTTP client for the slide copy endpoint.
//!
//! Endpoints are tried in order. A connection failure moves on to the next
//! one; any answer from a server, success or not, ends the attempt.

use std::sync::Arc;

use async_trait::async_trait;
use carousel_core::{CarouselError, CarouselResult, CopyGenerator, CopyRequest, CopyResponse};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Default copy server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// Message shown when no endpoint could be reached.
pub const UNREACHABLE_MESSAGE: &str = "Unable to connect to AI service. Please ensure either the backend server is running locally or deploy to Vercel.";

const ENDPOINT_PATHS: [&str; 2] = ["generate-carousel-text", "api/generate-carousel-text"];

/// Errors that can occur when asking for copy.
#[derive(Debug, Error)]
pub enum CopyClientError {
    /// The server URL is invalid.
    #[error("invalid copy service URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed after a connection was made.
    #[error("copy service request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a failure.
    #[error("{0}")]
    Service(String),
    /// No endpoint accepted a connection.
    #[error("{UNREACHABLE_MESSAGE}")]
    Unreachable,
}

impl CopyClientError {
    fn is_connect(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_connect())
    }
}

struct InnerClient {
    http: Client,
    endpoints: Vec<Url>,
}

/// Copy client with endpoint fallback.
#[derive(Clone)]
pub struct HttpCopyClient {
    inner: Arc<InnerClient>,
}

impl std::fmt::Debug for HttpCopyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCopyClient")
            .field("endpoints", &self.inner.endpoints)
            .finish_non_exhaustive()
    }
}

impl HttpCopyClient {
    /// Client for a carousel server. Tries `/generate-carousel-text` and then
    /// `/api/generate-carousel-text` under `server_url`.
    ///
    /// # Errors
    ///
    /// Returns [`CopyClientError::InvalidUrl`] if the URL is malformed.
    pub fn new(server_url: &str) -> Result<Self, CopyClientError> {
        let mut base =
            Url::parse(server_url).map_err(|e| CopyClientError::InvalidUrl(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoints = ENDPOINT_PATHS
            .iter()
            .map(|p| base.join(p))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CopyClientError::InvalidUrl(e.to_string()))?;
        Self::from_urls(endpoints)
    }

    /// Client for an explicit list of endpoint URLs.
    ///
    /// # Errors
    ///
    /// Returns [`CopyClientError::InvalidUrl`] if any URL is malformed or the
    /// list is empty.
    pub fn with_endpoints(endpoints: &[&str]) -> Result<Self, CopyClientError> {
        if endpoints.is_empty() {
            return Err(CopyClientError::InvalidUrl("no endpoints".into()));
        }
        let urls = endpoints
            .iter()
            .map(|e| Url::parse(e))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CopyClientError::InvalidUrl(e.to_string()))?;
        Self::from_urls(urls)
    }

    fn from_urls(endpoints: Vec<Url>) -> Result<Self, CopyClientError> {
        let http = Client::builder()
            .user_agent(concat!("carousel-cli/", env!("CARGO_PKG_VERSION")))
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?;
        Ok(Self {
            inner: Arc::new(InnerClient { http, endpoints }),
        })
    }

    /// Endpoints, in the order they are tried.
    #[must_use]
    pub fn endpoints(&self) -> &[Url] {
        &self.inner.endpoints
    }

    /// Ask for one piece of copy.
    ///
    /// # Errors
    ///
    /// Returns [`CopyClientError::Unreachable`] when no endpoint accepts a
    /// connection, or the first non-connection error.
    pub async fn request(&self, request: &CopyRequest) -> Result<String, CopyClientError> {
        for endpoint in &self.inner.endpoints {
            match self.post(endpoint, request).await {
                Err(e) if e.is_connect() => {
                    debug!(%endpoint, error = %e, "copy endpoint unreachable, trying next");
                }
                other => return other,
            }
        }
        Err(CopyClientError::Unreachable)
    }

    async fn post(&self, endpoint: &Url, request: &CopyRequest) -> Result<String, CopyClientError> {
        let response = self
            .inner
            .http
            .post(endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body: CopyResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(CopyClientError::Service(format!(
                    "HTTP error! status: {}",
                    status.as_u16()
                )))
            }
            Err(e) => return Err(e.into()),
        };
        body.into_text()
            .map_err(|e| CopyClientError::Service(e.to_string()))
    }
}

#[async_trait]
impl CopyGenerator for HttpCopyClient {
    async fn generate(&self, request: &CopyRequest) -> CarouselResult<String> {
        self.request(request)
            .await
            .map_err(|e| CarouselError::Generation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::ProductBrief;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CopyRequest {
        CopyRequest {
            product: ProductBrief::new("Glow", "Skin tracker"),
            slide_number: 1,
            existing_texts: Vec::new(),
        }
    }

    fn closed_endpoint() -> String {
        let port = portpicker::pick_unused_port().expect("no available port");
        format!("http://127.0.0.1:{port}/generate-carousel-text")
    }

    #[test]
    fn default_endpoints_follow_server_url() {
        let client = HttpCopyClient::new("http://localhost:3000").expect("client");
        let endpoints: Vec<_> = client.endpoints().iter().map(Url::as_str).collect();
        assert_eq!(
            endpoints,
            vec![
                "http://localhost:3000/generate-carousel-text",
                "http://localhost:3000/api/generate-carousel-text"
            ]
        );
    }

    #[test]
    fn empty_endpoint_list_rejected() {
        assert!(matches!(
            HttpCopyClient::with_endpoints(&[]),
            Err(CopyClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn connection_failure_falls_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate-carousel-text"))
            .and(body_partial_json(json!({"slideNumber": 1})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "text": " Hi "})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fallback = format!("{}/api/generate-carousel-text", server.uri());
        let client =
            HttpCopyClient::with_endpoints(&[&closed_endpoint(), &fallback]).expect("client");
        assert_eq!(client.request(&request()).await.expect("text"), "Hi");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn service_error_is_terminal() {
        let first = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(
                json!({"success": false, "message": "OpenAI service not configured"}),
            ))
            .mount(&first)
            .await;
        let second = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "text": "x"})))
            .expect(0)
            .mount(&second)
            .await;

        let client = HttpCopyClient::with_endpoints(&[&first.uri(), &second.uri()]).expect("client");
        let err = client.request(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI service not configured");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn non_json_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = HttpCopyClient::with_endpoints(&[&server.uri()]).expect("client");
        let err = client.request(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 502");
    }

    #[tokio::test]
    async fn all_unreachable() {
        let client =
            HttpCopyClient::with_endpoints(&[&closed_endpoint(), &closed_endpoint()]).expect("client");
        let err = client.generate(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), UNREACHABLE_MESSAGE);
    }
}
