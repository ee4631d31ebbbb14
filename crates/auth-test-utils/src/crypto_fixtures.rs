//! Deterministic cryptographic fixtures for testing
//!
//! All fixtures are deterministic based on seed values.

use auth_service::crypto::SigningKey;
use auth_service::repositories::Identity;
use base64::engine::general_purpose;
use base64::Engine;

/// bcrypt cost used for fixture hashes (the minimum bcrypt accepts).
pub const TEST_BCRYPT_COST: u32 = 4;

/// Raw bytes of a deterministic 32-byte signing key.
///
/// The same seed always produces the same bytes; different seeds produce
/// different keys.
pub fn test_signing_key_bytes(seed: u8) -> Vec<u8> {
    (0..32u8)
        .map(|i| seed.wrapping_mul(31).wrapping_add(i.wrapping_mul(7)))
        .collect()
}

/// Deterministic signing key for the given seed.
pub fn test_signing_key(seed: u8) -> SigningKey {
    SigningKey::new(test_signing_key_bytes(seed)).expect("32-byte fixture key is always valid")
}

/// The seed's key in the base64 form `JWT_SECRET` expects.
pub fn test_signing_key_base64(seed: u8) -> String {
    general_purpose::STANDARD.encode(test_signing_key_bytes(seed))
}

/// Hash a secret with the cheap fixture cost.
pub fn test_secret_hash(secret: &str) -> String {
    bcrypt::hash(secret, TEST_BCRYPT_COST).expect("bcrypt hashing should succeed")
}

/// Build an identity whose stored hash matches `secret`.
pub fn test_identity(identifier: &str, secret: &str, role: &str) -> Identity {
    Identity {
        identifier: identifier.to_string(),
        secret_hash: test_secret_hash(secret),
        role: role.to_string(),
    }
}
