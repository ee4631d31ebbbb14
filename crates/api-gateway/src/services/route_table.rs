//! Route resolution.
//!
//! Maps a request path to an upstream by longest prefix, matching only on
//! path-segment boundaries (`/api` matches `/api` and `/api/x`, never `/apix`).

use crate::config::{RouteConfig, AUTH_ROUTE_PREFIX};

/// Whether a route passes through token enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Forwarded without validation (the auth service's own endpoints).
    Public,
    /// Forwarded only after the auth service confirms the token.
    Protected,
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    upstream: String,
    access: RouteAccess,
    strip_prefix: bool,
}

/// Result of resolving a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Matched prefix, used as a bounded metrics label.
    pub prefix: String,
    pub upstream: String,
    pub access: RouteAccess,
    /// Path to request on the upstream.
    pub forward_path: String,
}

/// Immutable route table, built once at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table: the public auth route plus the configured protected
    /// routes.
    pub fn new(auth_service_url: &str, protected: &[RouteConfig]) -> Self {
        let mut routes = vec![Route {
            prefix: AUTH_ROUTE_PREFIX.to_string(),
            upstream: auth_service_url.to_string(),
            access: RouteAccess::Public,
            strip_prefix: true,
        }];

        routes.extend(protected.iter().map(|r| Route {
            prefix: r.prefix.clone(),
            upstream: r.upstream.clone(),
            access: RouteAccess::Protected,
            strip_prefix: false,
        }));

        // Longest prefix first
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Self { routes }
    }

    /// Resolve `path` to its route, or `None` when nothing matches.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        self.routes
            .iter()
            .find(|route| matches_prefix(&route.prefix, path))
            .map(|route| ResolvedRoute {
                prefix: route.prefix.clone(),
                upstream: route.upstream.clone(),
                access: route.access,
                forward_path: if route.strip_prefix {
                    strip_route_prefix(&route.prefix, path)
                } else {
                    path.to_string()
                },
            })
    }
}

fn matches_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn strip_route_prefix(prefix: &str, path: &str) -> String {
    match path.strip_prefix(prefix) {
        Some("") | None => "/".to_string(),
        Some(rest) => rest.to_string(),
    }
}
