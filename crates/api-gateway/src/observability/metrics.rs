//! Metrics definitions for the API gateway.
//!
//! All metrics follow Prometheus naming conventions:
//! - `gw_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `decision`: forwarded, rejected, public
//! - `reason`: bounded by `BearerError`/`GatewayError` labels
//! - `outcome`: valid, invalid, unreachable
//! - `route`: configured route prefixes only

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
            Matcher::Prefix("gw_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.500, 1.000, 2.000, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        // Remote validation sits on every protected request
        .set_buckets_for_metric(
            Matcher::Prefix("gw_auth_validation".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set auth validation buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("gw_upstream_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
            ],
        )
        .map_err(|e| format!("Failed to set upstream request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record an enforcement decision
///
/// Metric: `gw_auth_decisions_total`
/// Labels: `decision`, `reason`
pub fn record_auth_decision(decision: &str, reason: Option<&str>) {
    let reason = reason.unwrap_or("none");
    counter!("gw_auth_decisions_total", "decision" => decision.to_string(), "reason" => reason.to_string())
        .increment(1);
}

/// Record a remote validation call
///
/// Metric: `gw_auth_validation_duration_seconds`, `gw_auth_validations_total`
/// Labels: `outcome`
pub fn record_auth_validation(outcome: &str, duration: Duration) {
    histogram!("gw_auth_validation_duration_seconds", "outcome" => outcome.to_string())
        .record(duration.as_secs_f64());

    counter!("gw_auth_validations_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a forwarded upstream request
///
/// Metric: `gw_upstream_request_duration_seconds`, `gw_upstream_requests_total`
/// Labels: `route`, `status`
pub fn record_upstream_request(route: &str, status: &str, duration: Duration) {
    histogram!("gw_upstream_request_duration_seconds", "route" => route.to_string(), "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("gw_upstream_requests_total", "route" => route.to_string(), "status" => status.to_string())
        .increment(1);
}

/// Record HTTP request completion
///
/// Metric: `gw_http_requests_total`, `gw_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
///
/// Proxied paths are collapsed into one `/proxy` endpoint; per-route detail is
/// in the upstream metrics.
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("gw_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("gw_http_requests_total",
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

fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        _ => "/proxy",
    }
}
