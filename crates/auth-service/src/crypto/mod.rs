//! Token signing and verification, plus the secret-hash comparison primitive.
//!
//! Tokens are compact JWS strings signed with HS256 using one process-wide
//! symmetric key. The key is decoded once at startup into a [`SigningKey`] and
//! handed to a [`TokenCodec`], which derives both the encoding and the decoding
//! key from the same bytes. There is no rotation and no revocation list:
//! validity is a pure function of signature and expiry.

use crate::config::MIN_SIGNING_KEY_BYTES;
use crate::errors::AuthError;
use chrono::{DateTime, Utc};
use common::bearer::MAX_TOKEN_SIZE_BYTES;
use common::secret::{ExposeSecret, SecretBox};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::instrument;

/// Lifetime of an issued token (10 hours).
pub const TOKEN_TTL_SECONDS: i64 = 10 * 60 * 60;

/// Why a token failed to decode.
///
/// Callers outside this module must not distinguish these for response
/// purposes; the variant is only used for logs and metrics.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("The access token is invalid or expired")]
    Malformed,

    #[error("The access token is invalid or expired")]
    InvalidSignature,

    #[error("The access token is invalid or expired")]
    Expired,
}

impl TokenError {
    /// Bounded label for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
        }
    }
}

/// Token claims.
///
/// The `sub` field contains the user identifier (an email address) and is
/// redacted in Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user identifier)
    pub role: String, // Opaque role, never interpreted here
    pub iat: i64,     // Issued at timestamp
    pub exp: i64,     // Expiration timestamp
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("role", &self.role)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Symmetric signing key material.
///
/// Debug is manually implemented to redact the key.
/// Clone is manually implemented because SecretBox requires explicit cloning.
pub struct SigningKey {
    bytes: SecretBox<Vec<u8>>,
}

impl SigningKey {
    /// Wrap decoded key bytes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Crypto` if the key is shorter than
    /// `MIN_SIGNING_KEY_BYTES`.
    pub fn new(bytes: Vec<u8>) -> Result<Self, AuthError> {
        if bytes.len() < MIN_SIGNING_KEY_BYTES {
            return Err(AuthError::Crypto(format!(
                "Invalid signing key length: {} (expected at least {})",
                bytes.len(),
                MIN_SIGNING_KEY_BYTES
            )));
        }

        Ok(Self {
            bytes: SecretBox::new(Box::new(bytes)),
        })
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.expose_secret().len()
    }

    /// Always false; construction rejects short keys.
    pub fn is_empty(&self) -> bool {
        self.bytes.expose_secret().is_empty()
    }
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        Self {
            bytes: SecretBox::new(Box::new(self.bytes.expose_secret().clone())),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Encodes and decodes signed tokens with a single signing key.
///
/// Constructed once at startup and shared read-only (behind `Arc`) by every
/// request. Holds no mutable state, so no locking is needed.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(signing_key: &SigningKey) -> Self {
        let secret = signing_key.bytes.expose_secret();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `decode`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `subject` with `iat = now` and `exp = now + TTL`.
    ///
    /// Deterministic for identical inputs and key.
    #[instrument(skip_all)]
    pub fn encode(&self, subject: &str, role: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            role: role.to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("Token signing operation failed: {}", e)))
    }

    /// Verify a token's signature, then its expiry against `now`.
    ///
    /// Validates:
    /// - Token size (must be <= MAX_TOKEN_SIZE_BYTES), before any parsing
    /// - Structure, algorithm (HS256 only) and required claims (`sub`, `exp`)
    /// - Signature
    /// - Expiry: valid only while `now < exp`
    #[instrument(skip_all)]
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                target: "auth.crypto",
                token_size = token.len(),
                max_size = MAX_TOKEN_SIZE_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(TokenError::Malformed);
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(target: "auth.crypto", error = %e, "Token verification failed");
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed,
                }
            })?;

        let now = now.timestamp();
        if now >= token_data.claims.exp {
            tracing::debug!(
                target: "auth.crypto",
                exp = token_data.claims.exp,
                now = now,
                "Token rejected: expired"
            );
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &"HS256")
            .field("ttl_seconds", &TOKEN_TTL_SECONDS)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Verify a plaintext secret against a bcrypt hash.
///
/// Comparison is constant-time inside the bcrypt crate.
#[instrument(skip_all)]
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(secret, hash)
        .map_err(|e| AuthError::Crypto(format!("Secret verification failed: {}", e)))
}
