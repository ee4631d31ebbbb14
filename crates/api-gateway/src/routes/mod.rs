//! HTTP routes for the API gateway.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::errors::GatewayError;
use crate::handlers;
use crate::middleware::{auth::AuthState, enforce_token, http_metrics_middleware};
use crate::services::{AuthClient, RouteTable, UpstreamClient};
use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub route_table: Arc<RouteTable>,

    /// Client for the auth service's `GET /validate`.
    pub auth_client: AuthClient,

    /// Client for forwarded requests.
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Build the route table and HTTP clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if an HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Ok(Self {
            route_table: Arc::new(RouteTable::new(&config.auth_service_url, &config.routes)),
            auth_client: AuthClient::new(&config.auth_service_url, config.auth_validation_timeout)?,
            upstream: UpstreamClient::new(config.upstream_timeout)?,
        })
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics endpoint
/// - Every other path - enforcement middleware, then the proxy
/// - TraceLayer for request logging
/// - HTTP metrics middleware
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = Arc::new(AuthState {
        route_table: state.route_table.clone(),
        auth_client: state.auth_client.clone(),
    });

    // Catch-all proxy; enforcement wraps the fallback itself
    let proxy_routes = Router::new()
        .fallback(handlers::proxy_request)
        .layer(middleware::from_fn_with_state(auth_state, enforce_token))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer (innermost)
    // 2. TimeoutLayer
    // 3. http_metrics_middleware (outermost)
    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(metrics_routes)
        .fallback_service(proxy_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(middleware::from_fn(http_metrics_middleware))
}
