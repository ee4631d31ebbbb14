//! Middleware for the API gateway.
//!
//! # Components
//!
//! - `auth` - Token enforcement for protected routes
//! - `http_metrics` - HTTP request metrics middleware

pub mod auth;
pub mod http_metrics;

pub use auth::enforce_token;
pub use http_metrics::http_metrics_middleware;
