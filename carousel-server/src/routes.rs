//! HTTP handlers for copy generation and export.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use carousel_core::{
    AspectRatio, AspectRatioConfig, CopyRequest, CopyResponse, DeckDocument, ProductBrief, Slide,
};
use carousel_renderer::ExportedFile;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::metrics;
use crate::validation::{self, ValidationError};
use crate::AppState;

/// Header carrying the number of slides written to a batch archive.
pub const EXPORTED_SLIDES_HEADER: &str = "x-exported-slides";
/// Header carrying the number of slides skipped in a batch archive.
pub const FAILED_SLIDES_HEADER: &str = "x-failed-slides";

/// Default number of hooks per request.
pub const DEFAULT_HOOK_COUNT: usize = 10;

const NOT_CONFIGURED: &str = "OpenAI service not configured";
const CAROUSEL_TEXT_FAILED: &str = "Failed to generate carousel text";
const HOOKS_FAILED: &str = "Failed to generate hooks";
const EXPORT_FAILED: &str = "Failed to export slides";

/// JSON error body. Every failure answers with `success: false`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,
    /// User-facing message.
    pub message: String,
    /// Underlying cause, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Handler failures.
#[derive(Debug)]
pub enum ApiError {
    /// Request rejected before any work was done.
    Validation(ValidationError),
    /// No API key configured.
    NotConfigured,
    /// The completions API failed.
    Generation {
        /// User-facing message.
        message: &'static str,
        /// Underlying cause.
        error: String,
    },
    /// Rendering or archiving failed.
    Export(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        metrics::record_validation_failure(err.kind());
        Self::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error) = match self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            Self::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                NOT_CONFIGURED.to_string(),
                None,
            ),
            Self::Generation { message, error } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message.to_string(),
                Some(error),
            ),
            Self::Export(error) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                EXPORT_FAILED.to_string(),
                Some(error),
            ),
        };
        let body = ErrorBody {
            success: false,
            message,
            error,
        };
        (status, Json(body)).into_response()
    }
}

/// Body of `POST /generate-carousel-text`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselTextRequest {
    /// The product.
    #[serde(default)]
    pub product: Option<ProductBrief>,
    /// 1-based slide number.
    #[serde(default = "first_slide")]
    pub slide_number: usize,
    /// Texts already on the slide.
    #[serde(default)]
    pub existing_texts: Vec<String>,
}

fn first_slide() -> usize {
    1
}

/// Body of `POST /generate-hooks`.
#[derive(Debug, Deserialize)]
pub struct HooksRequest {
    /// The product.
    #[serde(default)]
    pub product: Option<ProductBrief>,
    /// How many hooks to ask for.
    #[serde(default = "default_hook_count")]
    pub count: usize,
}

fn default_hook_count() -> usize {
    DEFAULT_HOOK_COUNT
}

/// Response of `POST /generate-hooks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HooksResponse {
    /// Always true on success.
    pub success: bool,
    /// Generated hooks.
    pub hooks: Vec<String>,
}

/// Body of `POST /api/export/slide`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSlideRequest {
    /// The slide.
    pub slide: Slide,
    /// 0-based position in the deck, used for the file name.
    #[serde(default)]
    pub index: usize,
    /// Export aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

/// Generate one piece of slide copy.
#[instrument(name = "generate_carousel_text", skip(state, body), fields(slide = body.slide_number))]
pub async fn generate_carousel_text(
    State(state): State<AppState>,
    Json(body): Json<CarouselTextRequest>,
) -> Result<Json<CopyResponse>, ApiError> {
    let product = validation::validate_product(body.product.as_ref())?.clone();
    let slide_number = validation::validate_slide_number(body.slide_number)?;
    let Some(client) = state.openai.as_ref() else {
        warn!("carousel text requested without an OpenAI key");
        metrics::record_generation("carousel_text", "not_configured", 0.0);
        return Err(ApiError::NotConfigured);
    };

    let request = CopyRequest {
        product,
        slide_number,
        existing_texts: body.existing_texts,
    };
    let started = Instant::now();
    match client.carousel_text(&request).await {
        Ok(text) => {
            metrics::record_generation(
                "carousel_text",
                "success",
                started.elapsed().as_secs_f64(),
            );
            Ok(Json(CopyResponse {
                success: true,
                text: Some(text),
                message: None,
            }))
        }
        Err(e) => {
            error!(error = %e, "carousel text generation failed");
            metrics::record_generation(
                "carousel_text",
                "failure",
                started.elapsed().as_secs_f64(),
            );
            Err(ApiError::Generation {
                message: CAROUSEL_TEXT_FAILED,
                error: e.to_string(),
            })
        }
    }
}

/// Generate a list of hooks.
#[instrument(name = "generate_hooks", skip(state, body), fields(count = body.count))]
pub async fn generate_hooks(
    State(state): State<AppState>,
    Json(body): Json<HooksRequest>,
) -> Result<Json<HooksResponse>, ApiError> {
    let product = validation::validate_product(body.product.as_ref())?;
    let count = validation::validate_hook_count(body.count)?;
    let Some(client) = state.openai.as_ref() else {
        warn!("hooks requested without an OpenAI key");
        metrics::record_generation("hooks", "not_configured", 0.0);
        return Err(ApiError::NotConfigured);
    };

    let started = Instant::now();
    match client.hooks(product, count).await {
        Ok(hooks) => {
            metrics::record_generation("hooks", "success", started.elapsed().as_secs_f64());
            Ok(Json(HooksResponse {
                success: true,
                hooks,
            }))
        }
        Err(e) => {
            error!(error = %e, "hook generation failed");
            metrics::record_generation("hooks", "failure", started.elapsed().as_secs_f64());
            Err(ApiError::Generation {
                message: HOOKS_FAILED,
                error: e.to_string(),
            })
        }
    }
}

/// Export a whole deck as a zip of slide images.
///
/// Slides that fail to render are left out; the counts travel in the
/// `x-exported-slides` and `x-failed-slides` headers.
#[instrument(name = "export_deck", skip(state, document), fields(slides = document.slides.len(), ratio = %document.aspect_ratio))]
pub async fn export_deck(
    State(state): State<AppState>,
    Json(document): Json<DeckDocument>,
) -> Result<Response, ApiError> {
    validation::validate_slides(&document.slides)?;

    let exporter = Arc::clone(&state.exporter);
    let started = Instant::now();
    let DeckDocument {
        aspect_ratio,
        slides,
    } = document;
    let batch = tokio::task::spawn_blocking(move || exporter.export_all(&slides, aspect_ratio))
        .await
        .map_err(|e| ApiError::Export(e.to_string()))?
        .map_err(|e| {
            error!(error = %e, "batch export failed");
            ApiError::Export(e.to_string())
        })?;

    let exported = batch.exported_count();
    let failed = batch.failed_count();
    metrics::record_export("batch", exported, failed, started.elapsed().as_secs_f64());
    info!(exported, failed, "{}", batch.summary());

    let mut response = file_response(batch.archive)?;
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(EXPORTED_SLIDES_HEADER),
        HeaderValue::from(exported),
    );
    headers.insert(
        HeaderName::from_static(FAILED_SLIDES_HEADER),
        HeaderValue::from(failed),
    );
    Ok(response)
}

/// Export one slide at preview scale.
#[instrument(name = "export_slide", skip(state, body), fields(index = body.index, ratio = %body.aspect_ratio))]
pub async fn export_slide(
    State(state): State<AppState>,
    Json(body): Json<ExportSlideRequest>,
) -> Result<Response, ApiError> {
    validation::validate_slide(&body.slide, body.index)?;

    let exporter = Arc::clone(&state.exporter);
    let started = Instant::now();
    let ExportSlideRequest {
        slide,
        index,
        aspect_ratio,
    } = body;
    let file = tokio::task::spawn_blocking(move || exporter.export_slide(&slide, index, aspect_ratio))
        .await
        .map_err(|e| ApiError::Export(e.to_string()))?;

    match file {
        Ok(file) => {
            metrics::record_export("single", 1, 0, started.elapsed().as_secs_f64());
            info!(file = %file.name, "slide exported");
            file_response(file)
        }
        Err(e) => {
            error!(error = %e, "slide export failed");
            metrics::record_export("single", 0, 1, started.elapsed().as_secs_f64());
            Err(ApiError::Export(e.to_string()))
        }
    }
}

/// List the export presets.
pub async fn aspect_ratios() -> Json<Vec<AspectRatioConfig>> {
    Json(AspectRatio::ALL.iter().map(|r| r.config()).collect())
}

fn file_response(file: ExportedFile) -> Result<Response, ApiError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.name))
        .map_err(|e| ApiError::Export(e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    )
        .into_response())
}
