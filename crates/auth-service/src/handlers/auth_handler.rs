//! Login and validation handlers.

use crate::errors::AuthError;
use crate::models::{LoginRequest, LoginResponse};
use crate::observability::metrics::{record_login, record_token_validation};
use crate::routes::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use common::bearer::extract_bearer_token;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Handle login request
///
/// POST /login
///
/// Any body that cannot be read as `{identifier, secret}` is answered exactly
/// like a failed credential check.
#[instrument(skip_all, name = "auth.handlers.login")]
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(
            target: "auth.handlers",
            rejection = %rejection.body_text(),
            "Login body rejected"
        );
        record_login("error", start.elapsed());
        AuthError::AuthenticationFailed
    })?;

    let result = state
        .auth_service
        .login(&request.identifier, &request.secret)
        .await;

    let status = if result.is_ok() { "success" } else { "error" };
    record_login(status, start.elapsed());

    Ok(Json(LoginResponse { token: result? }))
}

/// Handle token validation request
///
/// GET /validate
///
/// Returns 200 with an empty body for a valid token, 401 with an empty body
/// otherwise.
#[instrument(skip_all, name = "auth.handlers.validate")]
pub async fn handle_validate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AuthError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let token = extract_bearer_token(header).map_err(|e| {
        tracing::debug!(target: "auth.handlers", reason = e.as_str(), "Credential header rejected");
        record_token_validation("error", Some(e.as_str()));
        AuthError::MalformedCredentialHeader
    })?;

    if !state.auth_service.validate_token(token) {
        return Err(AuthError::InvalidToken);
    }

    Ok(StatusCode::OK)
}
