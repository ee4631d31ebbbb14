//! Observability module for the auth service.
//!
//! All instrumentation uses `#[instrument(skip_all)]`. Secrets, tokens and
//! identifiers never appear in span fields or metric labels.

pub mod metrics;
