//! Credential verification.
//!
//! Looks up an identity by identifier and compares the presented secret with
//! the stored hash. Both collaborators are injected as traits so the verifier
//! does not depend on Postgres or bcrypt directly.

use crate::crypto;
use crate::repositories::{Identity, IdentityStore};
use common::secret::{ExposeSecret, SecretString};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Compares a plaintext secret with a stored hash.
///
/// Implementations are responsible for constant-time comparison.
pub trait SecretComparator: Send + Sync {
    fn matches(&self, plaintext: &str, hash: &str) -> bool;
}

/// bcrypt-backed comparator.
///
/// A stored hash that bcrypt cannot parse counts as a mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptComparator;

impl SecretComparator for BcryptComparator {
    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        match crypto::verify_secret(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(
                    target: "auth.services.credential_verifier",
                    error = %e,
                    "Stored secret hash could not be parsed, treating as mismatch"
                );
                false
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Authentication failed")]
    NotFound,

    #[error("Authentication failed")]
    MismatchedSecret,

    /// Storage failure; not an authentication outcome.
    #[error("Identity store error: {0}")]
    Store(String),
}

impl CredentialError {
    /// Bounded label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialError::NotFound => "not_found",
            CredentialError::MismatchedSecret => "mismatched_secret",
            CredentialError::Store(_) => "store",
        }
    }
}

#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn IdentityStore>,
    comparator: Arc<dyn SecretComparator>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn IdentityStore>, comparator: Arc<dyn SecretComparator>) -> Self {
        Self { store, comparator }
    }

    /// Verify a credential pair and return the matching identity.
    #[instrument(skip_all, name = "auth.credentials.verify")]
    pub async fn verify(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<Identity, CredentialError> {
        let identity = self
            .store
            .find_by_identifier(identifier)
            .await
            .map_err(|e| CredentialError::Store(e.to_string()))?
            .ok_or(CredentialError::NotFound)?;

        if !self
            .comparator
            .matches(secret.expose_secret(), &identity.secret_hash)
        {
            return Err(CredentialError::MismatchedSecret);
        }

        Ok(identity)
    }
}
