//! Proxy handler.

use crate::errors::GatewayError;
use crate::routes::AppState;
use crate::services::ResolvedRoute;
use axum::{
    extract::{Request, State},
    response::Response,
    Extension,
};
use std::sync::Arc;

/// Forward a request that has passed enforcement.
///
/// The route was resolved by the enforcement middleware.
pub async fn proxy_request(
    State(state): State<Arc<AppState>>,
    Extension(route): Extension<ResolvedRoute>,
    request: Request,
) -> Result<Response, GatewayError> {
    state.upstream.forward(request, &route).await
}
