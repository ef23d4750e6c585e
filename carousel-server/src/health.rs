//! Health check endpoints for Kubernetes probes.
//!
//! Provides liveness and readiness probes for container orchestration:
//! - `/health/live` - Liveness probe (restart if fails)
//! - `/health/ready` - Readiness probe (remove from LB if fails)
//! - `/health` - Same as readiness

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "healthy", "degraded" (exports only) or "unhealthy"
    pub status: String,
    /// Server version
    pub version: String,
    /// Individual component checks
    pub checks: HealthChecks,
}

/// Individual health checks.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    /// Slide exporter can render
    pub exporter: bool,
    /// OpenAI key configured
    pub copywriter: bool,
}

impl HealthChecks {
    fn status(&self) -> &'static str {
        match (self.exporter, self.copywriter) {
            (true, true) => "healthy",
            (true, false) => "degraded",
            (false, _) => "unhealthy",
        }
    }
}

/// Liveness probe - is the server running?
///
/// Returns 200 OK if the process is alive.
#[tracing::instrument(name = "liveness_probe")]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe - can the server take traffic?
///
/// Without an OpenAI key the server still exports, so it stays ready and
/// reports "degraded".
#[tracing::instrument(name = "readiness_probe", skip(state))]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let checks = HealthChecks {
        exporter: state.exporter.config().batch_scale > 0.0,
        copywriter: state.openai.is_some(),
    };

    let code = if checks.exporter {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let status = HealthStatus {
        status: checks.status().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    (code, Json(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_checks() {
        let checks = HealthChecks {
            exporter: true,
            copywriter: true,
        };
        assert_eq!(checks.status(), "healthy");
        let checks = HealthChecks {
            exporter: true,
            copywriter: false,
        };
        assert_eq!(checks.status(), "degraded");
        let checks = HealthChecks {
            exporter: false,
            copywriter: true,
        };
        assert_eq!(checks.status(), "unhealthy");
    }

    #[test]
    fn test_health_status_serialization() {
        let status = HealthStatus {
            status: "degraded".into(),
            version: "0.1.0".into(),
            checks: HealthChecks {
                exporter: true,
                copywriter: false,
            },
        };

        let json = serde_json::to_string(&status).expect("should serialize");
        assert!(json.contains("degraded"));
        assert!(json.contains("\"copywriter\":false"));
    }
}
