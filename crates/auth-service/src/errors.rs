//! Auth service error types.
//!
//! Every authentication outcome that a caller is refused for maps to the same
//! bare `401 Unauthorized` with an empty body. Which check failed is only ever
//! logged server-side. Database and signing failures map to 500 with a generic body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier or wrong secret. Deliberately a single variant.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// `Authorization` header missing or not `Bearer <token>`.
    #[error("Malformed credential header")]
    MalformedCredentialHeader,

    /// Bad signature, malformed structure or expired token.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::AuthenticationFailed
            | AuthError::MalformedCredentialHeader
            | AuthError::InvalidToken => 401,
            AuthError::Database(_) | AuthError::Crypto(_) => 500,
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

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AuthError::AuthenticationFailed
            | AuthError::MalformedCredentialHeader
            | AuthError::InvalidToken => {
                tracing::debug!(target: "auth.errors", kind = %self, "Request unauthorized");
                return StatusCode::UNAUTHORIZED.into_response();
            }
            AuthError::Database(err) => {
                tracing::error!(target: "auth.database", error = %err, "Database operation failed");
                ("DATABASE_ERROR", "An internal database error occurred")
            }
            AuthError::Crypto(err) => {
                tracing::error!(target: "auth.crypto", error = %err, "Cryptographic operation failed");
                ("CRYPTO_ERROR", "An internal cryptographic error occurred")
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)).into_response()
    }
}
