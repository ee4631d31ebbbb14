//! Common utilities and types shared by the auth service and the API gateway.

#![warn(clippy::pedantic)]

/// Module for bearer credential header parsing (shape checks, size limits)
pub mod bearer;

/// Module for secret types that prevent accidental logging
pub mod secret;
