//! Request and response bodies for the auth service HTTP surface.

use common::secret::SecretString;
use serde::{Deserialize, Serialize};

/// `POST /login` body.
///
/// `email`/`password` are accepted as aliases for `identifier`/`secret`.
/// The secret is redacted in Debug output.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "email")]
    pub identifier: String,
    #[serde(alias = "password")]
    pub secret: SecretString,
}

/// `POST /login` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
