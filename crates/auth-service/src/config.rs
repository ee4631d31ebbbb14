//! Auth service configuration.
//!
//! Configuration is loaded from environment variables. The signing key and the
//! database URL are redacted in Debug output.

use crate::crypto::SigningKey;
use base64::{engine::general_purpose, Engine as _};
use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:4005";

/// Minimum decoded signing key length in bytes.
///
/// HS256 needs a key at least as long as the SHA-256 output (256 bits).
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL for the identity store.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:4005").
    pub bind_address: String,

    /// Symmetric token signing key, decoded from `JWT_SECRET`.
    pub signing_key: SigningKey,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret_base64: SecretString = vars
            .get("JWT_SECRET")
            .cloned()
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let key_bytes = general_purpose::STANDARD
            .decode(jwt_secret_base64.expose_secret().trim())
            .map_err(ConfigError::Base64Error)?;

        if key_bytes.len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::InvalidSigningKey(format!(
                "Expected at least {} bytes, got {}",
                MIN_SIGNING_KEY_BYTES,
                key_bytes.len()
            )));
        }

        let signing_key = SigningKey::new(key_bytes)
            .map_err(|e| ConfigError::InvalidSigningKey(e.to_string()))?;

        Ok(Config {
            database_url,
            bind_address,
            signing_key,
        })
    }
}
