//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types for
//! every value that must never appear in logs or `Debug` output: login secrets
//! and signing-key material.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so any
//! struct deriving `Debug` that holds one gets safe logging behaviour for free.
//! Secrets are zeroized when dropped.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Credential {
//!     identifier: String,
//!     secret: SecretString,  // Debug shows "[REDACTED]"
//! }
//!
//! let credential = Credential {
//!     identifier: "a@b.com".to_string(),
//!     secret: SecretString::from("correct"),
//! };
//!
//! assert!(!format!("{credential:?}").contains("correct"));
//! assert_eq!(credential.secret.expose_secret(), "correct");
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - Plaintext login secrets received on `POST /login`
//! - Base64 signing-key material read from the environment (`JWT_SECRET`)
//!
//! Use `SecretBox<T>` for:
//! - Decoded binary keys (`SecretBox<Vec<u8>>`)
//!
//! With the `serde` feature enabled (on by default in this workspace), secrets
//! deserialize straight from JSON request bodies.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
