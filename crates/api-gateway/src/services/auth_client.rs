//! Auth service HTTP client for remote token validation.
//!
//! # Security
//!
//! - The caller's `Authorization` header is forwarded unchanged
//! - Redirects are never followed
//! - Every failure to get a definite answer is reported as
//!   `RemoteValidationUnreachable`, which callers treat as unauthorized

use crate::errors::GatewayError;
use crate::observability::metrics::record_auth_validation;
use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use reqwest::{redirect, Client};
use std::time::{Duration, Instant};
use tracing::{error, instrument, warn};

/// HTTP client for `GET {AUTH_SERVICE_URL}/validate`.
#[derive(Debug, Clone)]
pub struct AuthClient {
    /// HTTP client with configured timeouts.
    client: Client,

    validate_url: String,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// `timeout` bounds the whole call and the connect phase.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| {
                error!(target: "gw.services.auth_client", error = %e, "Failed to build HTTP client");
                GatewayError::Internal
            })?;

        Ok(Self {
            client,
            validate_url: format!("{}/validate", base_url.trim_end_matches('/')),
        })
    }

    /// Ask the auth service whether the presented credential is valid.
    ///
    /// # Errors
    ///
    /// - `GatewayError::InvalidToken` if the auth service answers 401
    /// - `GatewayError::RemoteValidationUnreachable` on network error, timeout
    ///   or any other 4xx/5xx status
    #[instrument(skip_all, name = "gw.auth_client.validate")]
    pub async fn validate(&self, authorization: &HeaderValue) -> Result<(), GatewayError> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.validate_url)
            .header(AUTHORIZATION, authorization.clone())
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "timeout" } else { "network" };
                warn!(target: "gw.services.auth_client", error = %e, reason, "Auth service request failed");
                record_auth_validation("unreachable", start.elapsed());
                GatewayError::RemoteValidationUnreachable(reason.to_string())
            })?;

        let result = Self::map_status(response.status());

        let outcome = match &result {
            Ok(()) => "valid",
            Err(GatewayError::InvalidToken) => "invalid",
            Err(_) => "unreachable",
        };
        record_auth_validation(outcome, start.elapsed());

        result
    }

    /// Non-error statuses allow; 401 denies; anything else fails closed.
    fn map_status(status: StatusCode) -> Result<(), GatewayError> {
        if !status.is_client_error() && !status.is_server_error() {
            Ok(())
        } else if status == StatusCode::UNAUTHORIZED {
            Err(GatewayError::InvalidToken)
        } else {
            warn!(target: "gw.services.auth_client", status = %status, "Unexpected auth service response");
            Err(GatewayError::RemoteValidationUnreachable(format!(
                "unexpected status {}",
                status.as_u16()
            )))
        }
    }
}
