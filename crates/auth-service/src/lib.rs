//! Auth Service Library
//!
//! Owns credentials, issues signed bearer tokens and validates them.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Token signing/verification and secret hash comparison
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Request/response bodies
//! - `observability` - Metrics
//! - `repositories` - Identity store
//! - `routes` - Router construction
//! - `services` - Credential verification, login and validation

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
