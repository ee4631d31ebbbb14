//! Service layer for the API gateway.
//!
//! # Components
//!
//! - `auth_client` - HTTP client for the auth service's `GET /validate`
//! - `route_table` - Path prefix to upstream resolution
//! - `upstream` - Request forwarding to upstream services

pub mod auth_client;
pub mod route_table;
pub mod upstream;

pub use auth_client::AuthClient;
pub use route_table::{ResolvedRoute, RouteAccess, RouteTable};
pub use upstream::UpstreamClient;
