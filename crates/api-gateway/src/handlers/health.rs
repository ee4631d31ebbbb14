//! Liveness probe.

/// Returns "OK" while the process is running. Does not call the auth service
/// or any upstream.
pub async fn health_check() -> &'static str {
    "OK"
}
