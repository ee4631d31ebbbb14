//! HTTP routes for the auth service.
//!
//! Defines the Axum router and application state.

use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::AuthService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `POST /login` - Exchange credentials for a token
/// - `GET /validate` - Check a bearer token
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics endpoint
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(handlers::handle_login))
        .route("/validate", get(handlers::handle_validate))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer (innermost)
    // 2. TimeoutLayer
    // 3. http_metrics_middleware (outermost)
    auth_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
