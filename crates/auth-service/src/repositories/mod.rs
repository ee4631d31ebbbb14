//! Database access layer for the auth service.

pub mod users;

pub use users::{Identity, IdentityStore, PgIdentityStore};
// In-memory store for tests and the test harness
#[allow(unused_imports)]
pub use users::mock::InMemoryIdentityStore;
