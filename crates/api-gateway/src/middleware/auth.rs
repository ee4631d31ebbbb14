//! Token enforcement middleware.
//!
//! Runs in front of every proxied request:
//! 1. Resolve the route (unknown path: 404). Public routes pass straight through.
//! 2. Local shape check of the `Authorization` header. A failure rejects with
//!    no remote call.
//! 3. Remote `GET /validate` carrying the original header. Only a definite
//!    non-error answer lets the request continue; everything else rejects.
//!
//! The resolved route is stored in request extensions for the proxy handler.

use crate::errors::GatewayError;
use crate::observability::metrics::record_auth_decision;
use crate::services::{AuthClient, RouteAccess, RouteTable};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::Response,
};
use common::bearer::{extract_bearer_token, BearerError};
use std::sync::Arc;
use tracing::instrument;

/// State for the enforcement middleware.
#[derive(Clone)]
pub struct AuthState {
    pub route_table: Arc<RouteTable>,
    pub auth_client: AuthClient,
}

/// Shape-check the `Authorization` header and return it unchanged.
fn checked_credential(req: &Request) -> Result<HeaderValue, BearerError> {
    let value = req.headers().get(AUTHORIZATION).ok_or(BearerError::Missing)?;
    let text = value.to_str().map_err(|_| BearerError::WrongScheme)?;
    extract_bearer_token(Some(text))?;
    Ok(value.clone())
}

/// Enforcement middleware for proxied routes.
///
/// # Response
///
/// - 404 if no route matches the path
/// - 401 (empty body) if the header is malformed, the token is rejected, or
///   the auth service cannot give a definite answer
/// - Otherwise continues to the proxy handler with `ResolvedRoute` in
///   extensions
#[instrument(skip_all, name = "gw.middleware.auth")]
pub async fn enforce_token(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let route = state.route_table.resolve(req.uri().path()).ok_or_else(|| {
        tracing::debug!(target: "gw.middleware.auth", "No route for request path");
        GatewayError::RouteNotFound
    })?;

    if route.access == RouteAccess::Public {
        record_auth_decision("public", None);
        req.extensions_mut().insert(route);
        return Ok(next.run(req).await);
    }

    let credential = checked_credential(&req).map_err(|e| {
        tracing::debug!(target: "gw.middleware.auth", reason = e.as_str(), "Credential header rejected");
        record_auth_decision("rejected", Some(e.as_str()));
        GatewayError::MalformedCredentialHeader
    })?;

    state.auth_client.validate(&credential).await.map_err(|e| {
        tracing::debug!(target: "gw.middleware.auth", reason = e.as_str(), "Token rejected");
        record_auth_decision("rejected", Some(e.as_str()));
        e
    })?;

    record_auth_decision("forwarded", None);
    req.extensions_mut().insert(route);
    Ok(next.run(req).await)
}
