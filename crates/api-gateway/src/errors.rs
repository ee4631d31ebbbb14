//! API gateway error types.
//!
//! Every refusal to authorize a request maps to the same bare
//! `401 Unauthorized` with a constant `WWW-Authenticate` challenge and an empty
//! body. Which check failed is only logged. Routing and upstream failures map
//! to generic JSON errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Challenge sent with every 401.
pub const WWW_AUTHENTICATE_CHALLENGE: &str = "Bearer realm=\"api-gateway\"";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// `Authorization` header missing or not `Bearer <token>`.
    #[error("Malformed credential header")]
    MalformedCredentialHeader,

    /// The auth service answered 401.
    #[error("Invalid token")]
    InvalidToken,

    /// The auth service could not give a definite answer (network error,
    /// timeout, unexpected status).
    #[error("Remote validation unreachable: {0}")]
    RemoteValidationUnreachable(String),

    #[error("No route for path")]
    RouteNotFound,

    #[error("Request body too large")]
    PayloadTooLarge,

    /// Client body could not be read (aborted upload, malformed chunking).
    #[error("Invalid request body")]
    InvalidRequestBody,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal server error")]
    Internal,
}

impl GatewayError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::MalformedCredentialHeader
            | GatewayError::InvalidToken
            | GatewayError::RemoteValidationUnreachable(_) => 401,
            GatewayError::RouteNotFound => 404,
            GatewayError::PayloadTooLarge => 413,
            GatewayError::InvalidRequestBody => 400,
            GatewayError::UpstreamUnavailable(_) => 502,
            GatewayError::Internal => 500,
        }
    }

    /// Bounded label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayError::MalformedCredentialHeader => "malformed_credential_header",
            GatewayError::InvalidToken => "invalid_token",
            GatewayError::RemoteValidationUnreachable(_) => "remote_validation_unreachable",
            GatewayError::RouteNotFound => "route_not_found",
            GatewayError::PayloadTooLarge => "payload_too_large",
            GatewayError::InvalidRequestBody => "invalid_request_body",
            GatewayError::UpstreamUnavailable(_) => "upstream_unavailable",
            GatewayError::Internal => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::MalformedCredentialHeader
            | GatewayError::InvalidToken
            | GatewayError::RemoteValidationUnreachable(_) => {
                tracing::debug!(target: "gw.errors", kind = %self, "Request unauthorized");
                let mut response = StatusCode::UNAUTHORIZED.into_response();
                response.headers_mut().insert(
                    WWW_AUTHENTICATE,
                    HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
                );
                return response;
            }
            GatewayError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "No route matches the request path",
            ),
            GatewayError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "Request body too large",
            ),
            GatewayError::InvalidRequestBody => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Request body could not be read",
            ),
            GatewayError::UpstreamUnavailable(reason) => {
                tracing::warn!(target: "gw.upstream", reason = %reason, "Upstream unavailable");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_UNAVAILABLE",
                    "Upstream service unavailable",
                )
            }
            GatewayError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred",
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        (status, Json(error_response)).into_response()
    }
}
