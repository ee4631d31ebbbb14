//! Observability module for the API gateway.
//!
//! Provides metrics definitions. Tokens never appear in spans or labels.

pub mod metrics;
