//! User repository.
//!
//! Identities are read-only from the service's point of view: accounts are
//! provisioned out of band and looked up here by identifier (email).

use crate::errors::AuthError;
use sqlx::PgPool;

/// A provisioned identity (maps to the users table).
///
/// Debug is manually implemented so the stored hash never reaches logs.
#[derive(Clone, sqlx::FromRow)]
pub struct Identity {
    #[sqlx(rename = "email")]
    pub identifier: String,
    #[sqlx(rename = "password")]
    pub secret_hash: String,
    pub role: String,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("identifier", &self.identifier)
            .field("secret_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Identity lookup (enables mocking).
#[async_trait::async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an identity by its exact identifier.
    ///
    /// Returns `Ok(None)` when no identity matches; `Err` only for storage
    /// failures.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, AuthError>;
}

/// PostgreSQL-backed identity store.
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IdentityStore for PgIdentityStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Identity>, AuthError> {
        let identity = sqlx::query_as::<_, Identity>(
            r#"
            SELECT email, password, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to fetch user by email: {}", e)))?;

        Ok(identity)
    }
}

/// In-memory identity store for testing.
pub mod mock {

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Identity store backed by a fixed map.
    pub struct InMemoryIdentityStore {
        identities: HashMap<String, Identity>,
        /// Number of lookups made.
        lookup_count: AtomicUsize,
        /// Whether to return storage errors.
        return_error: bool,
    }

    impl InMemoryIdentityStore {
        /// Create a store holding the given identities.
        pub fn new(identities: Vec<Identity>) -> Self {
            Self {
                identities: identities
                    .into_iter()
                    .map(|identity| (identity.identifier.clone(), identity))
                    .collect(),
                lookup_count: AtomicUsize::new(0),
                return_error: false,
            }
        }

        /// Create a store whose every lookup fails.
        pub fn failing() -> Self {
            Self {
                identities: HashMap::new(),
                lookup_count: AtomicUsize::new(0),
                return_error: true,
            }
        }

        /// Get the number of lookups made.
        pub fn lookup_count(&self) -> usize {
            self.lookup_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl IdentityStore for InMemoryIdentityStore {
        async fn find_by_identifier(
            &self,
            identifier: &str,
        ) -> Result<Option<Identity>, AuthError> {
            self.lookup_count.fetch_add(1, Ordering::SeqCst);

            if self.return_error {
                return Err(AuthError::Database(
                    "Mock identity store error".to_string(),
                ));
            }

            Ok(self.identities.get(identifier).cloned())
        }
    }

}
