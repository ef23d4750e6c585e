//! Prometheus metrics for carousel-server.
//!
//! Provides metrics collection and a Prometheus-compatible `/metrics` endpoint.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

const GENERATION_REQUESTS_TOTAL: &str = "carousel_generation_requests_total";
const GENERATION_DURATION: &str = "carousel_generation_duration_seconds";
const EXPORTED_SLIDES_TOTAL: &str = "carousel_exported_slides_total";
const FAILED_SLIDES_TOTAL: &str = "carousel_failed_slides_total";
const EXPORT_DURATION: &str = "carousel_export_duration_seconds";
const VALIDATION_FAILURES_TOTAL: &str = "carousel_validation_failures_total";

/// Initialize metrics and return the Prometheus handle.
///
/// # Errors
///
/// Returns an error if the Prometheus recorder cannot be installed
/// (e.g., if another recorder is already installed).
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Record a completion request.
///
/// # Arguments
///
/// * `kind` - "carousel_text" or "hooks"
/// * `outcome` - "success", "failure" or "not_configured"
/// * `duration_secs` - Time spent waiting on the API
pub fn record_generation(kind: &'static str, outcome: &'static str, duration_secs: f64) {
    counter!(GENERATION_REQUESTS_TOTAL, "kind" => kind, "outcome" => outcome).increment(1);
    histogram!(GENERATION_DURATION, "kind" => kind).record(duration_secs);
}

/// Record an export run.
///
/// # Arguments
///
/// * `kind` - "batch" or "single"
/// * `exported` - Slides written
/// * `failed` - Slides skipped after a render failure
/// * `duration_secs` - Wall time of the export
pub fn record_export(kind: &'static str, exported: usize, failed: usize, duration_secs: f64) {
    counter!(EXPORTED_SLIDES_TOTAL, "kind" => kind).increment(exported as u64);
    counter!(FAILED_SLIDES_TOTAL, "kind" => kind).increment(failed as u64);
    histogram!(EXPORT_DURATION, "kind" => kind).record(duration_secs);
}

/// Record an input validation failure.
///
/// # Arguments
///
/// * `validation_type` - Type of validation that failed (product, slide_count, hook_count, etc.)
pub fn record_validation_failure(validation_type: &'static str) {
    counter!(VALIDATION_FAILURES_TOTAL, "type" => validation_type).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn test_generation_counter_labels() {
        let output = render_with(|| {
            record_generation("hooks", "success", 0.25);
            record_generation("hooks", "success", 0.5);
        });
        assert!(output.contains(GENERATION_REQUESTS_TOTAL));
        assert!(output.contains(r#"kind="hooks""#));
        assert!(output.contains(r#"outcome="success""#));
        assert!(output.contains(GENERATION_DURATION));
    }

    #[test]
    fn test_export_counters() {
        let output = render_with(|| record_export("batch", 3, 1, 1.5));
        assert!(output.contains(&format!(r#"{EXPORTED_SLIDES_TOTAL}{{kind="batch"}} 3"#)));
        assert!(output.contains(&format!(r#"{FAILED_SLIDES_TOTAL}{{kind="batch"}} 1"#)));
    }

    #[test]
    fn test_validation_failure_counter() {
        let output = render_with(|| record_validation_failure("hook_count"));
        assert!(output.contains(VALIDATION_FAILURES_TOTAL));
        assert!(output.contains(r#"type="hook_count""#));
    }
}
