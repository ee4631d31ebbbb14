//! Service layer for the auth service.
//!
//! # Components
//!
//! - `credential_verifier` - Identity lookup plus secret comparison
//! - `auth_service` - Login and token validation on top of the verifier and codec

pub mod auth_service;
pub mod credential_verifier;

pub use auth_service::AuthService;
pub use credential_verifier::{
    BcryptComparator, CredentialError, CredentialVerifier, SecretComparator,
};
