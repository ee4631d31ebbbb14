//! # Auth Test Utilities
//!
//! Shared test utilities for the auth service and the gateway.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed signing keys, cheap bcrypt hashes)
//! - Server test harness (TestAuthServer for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestAuthServer::spawn(vec![test_identity("a@b.com", "correct", "USER")]).await?;
//!     let token = server.login("a@b.com", "correct").await?;
//!     assert!(server.codec().decode(&token, chrono::Utc::now()).is_ok());
//!     Ok(())
//! }
//! ```

pub mod crypto_fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use crypto_fixtures::*;
pub use server_harness::*;
