//! Login and token validation.
//!
//! Composes the credential verifier and the token codec. Unknown identifiers
//! and wrong secrets collapse into one `AuthenticationFailed`; every token
//! failure kind collapses into "invalid".

use crate::crypto::{Claims, TokenCodec, TokenError};
use crate::errors::AuthError;
use crate::observability::metrics::record_token_validation;
use crate::services::credential_verifier::{CredentialError, CredentialVerifier};
use chrono::{DateTime, Utc};
use common::secret::SecretString;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct AuthService {
    verifier: CredentialVerifier,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(verifier: CredentialVerifier, codec: Arc<TokenCodec>) -> Self {
        Self { verifier, codec }
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, identifier: &str, secret: &SecretString) -> Result<String, AuthError> {
        self.login_at(identifier, secret, Utc::now()).await
    }

    #[instrument(skip_all, name = "auth.service.login")]
    pub async fn login_at(
        &self,
        identifier: &str,
        secret: &SecretString,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let identity = self
            .verifier
            .verify(identifier, secret)
            .await
            .map_err(|e| match e {
                CredentialError::NotFound | CredentialError::MismatchedSecret => {
                    tracing::debug!(
                        target: "auth.service",
                        reason = e.as_str(),
                        "Login rejected"
                    );
                    AuthError::AuthenticationFailed
                }
                CredentialError::Store(err) => AuthError::Database(err),
            })?;

        let token = self.codec.encode(&identity.identifier, &identity.role, now)?;

        tracing::info!(target: "auth.service", "Token issued");
        Ok(token)
    }

    /// True iff the token decodes successfully at the current time.
    ///
    /// The failure kind is logged and counted here and never returned.
    pub fn validate_token(&self, token: &str) -> bool {
        match self.check_token_at(token, Utc::now()) {
            Ok(_) => {
                record_token_validation("success", None);
                true
            }
            Err(e) => {
                tracing::debug!(target: "auth.service", reason = e.as_str(), "Token rejected");
                record_token_validation("error", Some(e.as_str()));
                false
            }
        }
    }

    /// Decode a token at `now`, keeping the failure kind for logs and metrics.
    pub fn check_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        self.codec.decode(token, now)
    }
}
