//! API gateway configuration.
//!
//! Configuration is loaded from environment variables.

use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:4004";

/// Default timeout for the remote validation call in milliseconds.
pub const DEFAULT_AUTH_VALIDATION_TIMEOUT_MS: u64 = 2000;

/// Upper bound for `AUTH_VALIDATION_TIMEOUT_MS`.
pub const MAX_AUTH_VALIDATION_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for upstream requests in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 30;

/// Public prefix routed to the auth service with the prefix stripped.
pub const AUTH_ROUTE_PREFIX: &str = "/auth";

/// A protected route: requests under `prefix` are forwarded to `upstream`
/// after token validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub prefix: String,
    pub upstream: String,
}

/// API gateway configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the auth service (no trailing slash).
    pub auth_service_url: String,

    /// Server bind address (default: "0.0.0.0:4004").
    pub bind_address: String,

    /// Protected routes from `GATEWAY_ROUTES`.
    pub routes: Vec<RouteConfig>,

    /// Timeout for `GET /validate` (connect timeout uses the same bound).
    pub auth_validation_timeout: Duration,

    /// Timeout for forwarded upstream requests.
    pub upstream_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid URL configuration: {0}")]
    InvalidUrl(String),

    #[error("Invalid route configuration: {0}")]
    InvalidRoutes(String),

    #[error("Invalid timeout configuration: {0}")]
    InvalidTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let auth_service_url = vars
            .get("AUTH_SERVICE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTH_SERVICE_URL".to_string()))?;
        let auth_service_url = parse_base_url("AUTH_SERVICE_URL", auth_service_url)?;

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let routes = match vars.get("GATEWAY_ROUTES") {
            Some(value) => parse_routes(value)?,
            None => Vec::new(),
        };

        let auth_validation_timeout_ms =
            if let Some(value_str) = vars.get("AUTH_VALIDATION_TIMEOUT_MS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidTimeout(format!(
                        "AUTH_VALIDATION_TIMEOUT_MS must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidTimeout(
                        "AUTH_VALIDATION_TIMEOUT_MS must be positive, got 0".to_string(),
                    ));
                }

                if value > MAX_AUTH_VALIDATION_TIMEOUT_MS {
                    return Err(ConfigError::InvalidTimeout(format!(
                        "AUTH_VALIDATION_TIMEOUT_MS must not exceed {}, got {}",
                        MAX_AUTH_VALIDATION_TIMEOUT_MS, value
                    )));
                }

                value
            } else {
                DEFAULT_AUTH_VALIDATION_TIMEOUT_MS
            };

        let upstream_timeout_seconds =
            if let Some(value_str) = vars.get("UPSTREAM_TIMEOUT_SECONDS") {
                let value: u64 = value_str.parse().map_err(|e| {
                    ConfigError::InvalidTimeout(format!(
                        "UPSTREAM_TIMEOUT_SECONDS must be a valid integer, got '{}': {}",
                        value_str, e
                    ))
                })?;

                if value == 0 {
                    return Err(ConfigError::InvalidTimeout(
                        "UPSTREAM_TIMEOUT_SECONDS must be positive, got 0".to_string(),
                    ));
                }

                value
            } else {
                DEFAULT_UPSTREAM_TIMEOUT_SECONDS
            };

        Ok(Config {
            auth_service_url,
            bind_address,
            routes,
            auth_validation_timeout: Duration::from_millis(auth_validation_timeout_ms),
            upstream_timeout: Duration::from_secs(upstream_timeout_seconds),
        })
    }
}

/// Require an absolute http(s) URL and drop trailing slashes.
fn parse_base_url(name: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();

    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .ok_or_else(|| {
            ConfigError::InvalidUrl(format!("{} must start with http:// or https://", name))
        })?;

    if rest.trim_end_matches('/').is_empty() {
        return Err(ConfigError::InvalidUrl(format!("{} has no host", name)));
    }

    Ok(value.trim_end_matches('/').to_string())
}

/// Parse `GATEWAY_ROUTES`: comma-separated `/prefix=http://upstream` pairs.
fn parse_routes(value: &str) -> Result<Vec<RouteConfig>, ConfigError> {
    let mut routes: Vec<RouteConfig> = Vec::new();

    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (prefix, upstream) = entry.split_once('=').ok_or_else(|| {
            ConfigError::InvalidRoutes(format!("expected '/prefix=url', got '{}'", entry))
        })?;

        let prefix = prefix.trim();
        if !prefix.starts_with('/') {
            return Err(ConfigError::InvalidRoutes(format!(
                "route prefix must start with '/', got '{}'",
                prefix
            )));
        }

        let prefix = match prefix.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };

        if prefix == AUTH_ROUTE_PREFIX || prefix.starts_with("/auth/") {
            return Err(ConfigError::InvalidRoutes(format!(
                "route prefix '{}' is reserved for the auth service",
                prefix
            )));
        }

        if routes.iter().any(|r| r.prefix == prefix) {
            return Err(ConfigError::InvalidRoutes(format!(
                "duplicate route prefix '{}'",
                prefix
            )));
        }

        let upstream = parse_base_url("GATEWAY_ROUTES upstream", upstream)?;
        routes.push(RouteConfig { prefix, upstream });
    }

    Ok(routes)
}
