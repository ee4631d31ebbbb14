//! API Gateway Library
//!
//! Authorizes every inbound proxied request against the auth service before
//! forwarding it upstream. Fails closed: a request is forwarded only after a
//! definite positive answer from `GET /validate`.
//!
//! # Modules
//!
//! - `config` - Gateway configuration
//! - `errors` - Error types
//! - `handlers` - Health, metrics and proxy handlers
//! - `middleware` - Token enforcement and HTTP metrics
//! - `observability` - Metrics
//! - `routes` - Router construction
//! - `services` - Auth client, route table, upstream forwarding

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod services;
