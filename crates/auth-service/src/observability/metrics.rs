//! Metrics definitions for the auth service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `status`: success, error
//! - `reason`: bounded by `TokenError`/`BearerError` labels
//! - `endpoint`: the four known paths plus `/other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("auth_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // bcrypt dominates login latency
        .set_buckets_for_metric(
            Matcher::Prefix("auth_login".to_string()),
            &[0.010, 0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000],
        )
        .map_err(|e| format!("Failed to set login buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record a login attempt
///
/// Metric: `auth_login_duration_seconds`, `auth_login_total`
/// Labels: `status`
pub fn record_login(status: &str, duration: Duration) {
    histogram!("auth_login_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_login_total", "status" => status.to_string()).increment(1);
}

/// Record token validation result
///
/// Metric: `auth_token_validations_total`
/// Labels: `status`, `reason`
pub fn record_token_validation(status: &str, reason: Option<&str>) {
    let reason = reason.unwrap_or("none");
    counter!("auth_token_validations_total", "status" => status.to_string(), "reason" => reason.to_string())
        .increment(1);
}

/// Record HTTP request completion
///
/// Metric: `auth_http_requests_total`, `auth_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("auth_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("auth_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Unknown paths collapse to "/other" to bound cardinality.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/login" => "/login",
        "/validate" => "/validate",
        "/health" => "/health",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}
