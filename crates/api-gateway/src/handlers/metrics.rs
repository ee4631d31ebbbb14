//! Prometheus metrics endpoint handler.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
///
/// Served by the gateway itself, never proxied or token-checked.
#[tracing::instrument(skip_all, name = "gw.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
