//! Bearer credential header handling shared by the auth service and the gateway.
//!
//! Both sides of the boundary perform the same cheap, local shape check on the
//! `Authorization` header before doing anything expensive:
//! - The auth service before decoding a token on `GET /validate`
//! - The gateway before issuing the remote validation call
//!
//! # Security
//!
//! - Headers are size-checked BEFORE anything else (DoS prevention)
//! - Errors are intentionally generic; callers map every variant to the same
//!   unauthorized response and only log the specific kind

use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Authentication scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Maximum allowed token size in bytes (8KB).
///
/// Typical tokens issued by the auth service are 200-300 bytes. Anything larger
/// than this is rejected before base64 decoding or signature verification.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192; // 8KB

// =============================================================================
// Error Types
// =============================================================================

/// Reasons a credential header fails the local shape check.
///
/// Error messages are intentionally identical so that a `Display` of any
/// variant never reveals which check failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerError {
    /// No `Authorization` header was sent (or it was not valid UTF-8).
    #[error("Missing or malformed credential header")]
    Missing,

    /// The header does not use the `Bearer` scheme.
    #[error("Missing or malformed credential header")]
    WrongScheme,

    /// The header carries the `Bearer` scheme but no token.
    #[error("Missing or malformed credential header")]
    EmptyToken,

    /// The token exceeds [`MAX_TOKEN_SIZE_BYTES`].
    #[error("Missing or malformed credential header")]
    TooLarge,
}

impl BearerError {
    /// Short, bounded label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BearerError::Missing => "missing",
            BearerError::WrongScheme => "wrong_scheme",
            BearerError::EmptyToken => "empty_token",
            BearerError::TooLarge => "too_large",
        }
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Extract the token from an `Authorization` header value.
///
/// Accepts exactly `Bearer <token>` (case-sensitive scheme, single space).
/// The returned slice borrows from the header value.
///
/// # Errors
///
/// Returns a [`BearerError`] when the header is absent, uses another scheme,
/// carries an empty token, or is larger than [`MAX_TOKEN_SIZE_BYTES`].
///
/// # Example
///
/// ```rust
/// use common::bearer::{extract_bearer_token, BearerError};
///
/// assert_eq!(extract_bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
/// assert_eq!(extract_bearer_token(Some("Basic dXNlcjpwYXNz")), Err(BearerError::WrongScheme));
/// assert_eq!(extract_bearer_token(None), Err(BearerError::Missing));
/// ```
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, BearerError> {
    let header = header.ok_or(BearerError::Missing)?;

    if header.len() > MAX_TOKEN_SIZE_BYTES + BEARER_PREFIX.len() {
        tracing::debug!(
            target: "common.bearer",
            header_size = header.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Credential header rejected: size exceeds maximum allowed"
        );
        return Err(BearerError::TooLarge);
    }

    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::WrongScheme)?;

    if token.trim().is_empty() {
        return Err(BearerError::EmptyToken);
    }

    Ok(token)
}
