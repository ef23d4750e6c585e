//! # Carousel Server Library
//!
//! Shared types and functionality for the carousel server.
//! This library is used by both the binary and integration tests.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use carousel_renderer::SlideExporter;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod health;
pub mod metrics;
pub mod openai;
pub mod prompts;
pub mod routes;
pub mod validation;

pub use config::ServerConfig;
pub use openai::{CopywriterError, OpenAiClient};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Slide exporter, shared with blocking export tasks.
    pub exporter: Arc<SlideExporter>,
    /// Completions client; `None` when no API key is configured.
    pub openai: Option<OpenAiClient>,
}

impl AppState {
    /// Create state from an exporter and an optional client.
    #[must_use]
    pub fn new(exporter: SlideExporter, openai: Option<OpenAiClient>) -> Self {
        Self {
            exporter: Arc::new(exporter),
            openai,
        }
    }

    /// Get a reference to the optional completions client.
    pub fn openai(&self) -> Option<&OpenAiClient> {
        self.openai.as_ref()
    }
}

/// CORS for browser clients on any origin. The export count headers are
/// exposed so the caller can report partial failures.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static(routes::EXPORTED_SLIDES_HEADER),
            HeaderName::from_static(routes::FAILED_SLIDES_HEADER),
        ])
}

async fn metrics_handler(
    axum::extract::State(handle): axum::extract::State<PrometheusHandle>,
) -> String {
    handle.render()
}

/// Build the application router.
///
/// `metrics` mounts `/metrics` when a Prometheus recorder is installed.
pub fn build_router(
    state: AppState,
    body_limit: usize,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let mut app = Router::new()
        // Health check endpoints (Kubernetes probes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/health", get(health::readiness))
        // Copy generation, with the serverless-style paths as aliases
        .route(
            "/generate-carousel-text",
            post(routes::generate_carousel_text),
        )
        .route(
            "/api/generate-carousel-text",
            post(routes::generate_carousel_text),
        )
        .route("/generate-hooks", post(routes::generate_hooks))
        .route("/api/generate-hooks", post(routes::generate_hooks))
        // Export
        .route("/api/export", post(routes::export_deck))
        .route("/api/export/slide", post(routes::export_slide))
        .route("/api/aspect-ratios", get(routes::aspect_ratios))
        .with_state(state);

    if let Some(handle) = metrics {
        app = app.merge(
            Router::new()
                .route("/metrics", get(metrics_handler))
                .with_state(handle),
        );
    }

    app
        // Slides carry images as data URIs
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        // Request ID for distributed tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer())
        // Structured request tracing with timing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
