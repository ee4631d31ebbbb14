//! Upstream forwarding.
//!
//! Replays the inbound request (method, path, query, headers, body) against the
//! resolved upstream and relays the response. Hop-by-hop headers are dropped in
//! both directions. Request bodies are buffered up to a cap; response bodies
//! are streamed through to the client under their own cap.

use crate::errors::GatewayError;
use crate::observability::metrics::record_upstream_request;
use crate::services::route_table::ResolvedRoute;
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, HeaderName},
    response::{IntoResponse, Response},
};
use http_body_util::{LengthLimitError, Limited};
use reqwest::{redirect, Client};
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

/// Maximum request body forwarded upstream (10 MiB).
pub const MAX_FORWARD_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Maximum upstream response body relayed to the client (10 MiB).
pub const MAX_RELAYED_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Connect timeout for upstream services.
const UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection-level headers (RFC 9110 section 7.6.1).
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// HTTP client for upstream services.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns `GatewayError::Internal` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(UPSTREAM_CONNECT_TIMEOUT_SECS).min(timeout))
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| {
                error!(target: "gw.services.upstream", error = %e, "Failed to build HTTP client");
                GatewayError::Internal
            })?;

        Ok(Self { client })
    }

    /// Forward `request` to `route` and relay the upstream response.
    #[instrument(skip_all, name = "gw.upstream.forward", fields(route = %route.prefix))]
    pub async fn forward(
        &self,
        request: Request,
        route: &ResolvedRoute,
    ) -> Result<Response, GatewayError> {
        let start = Instant::now();
        let (parts, body) = request.into_parts();

        let body = to_bytes(body, MAX_FORWARD_BODY_BYTES)
            .await
            .map_err(|e| {
                if exceeded_length_limit(&e) {
                    GatewayError::PayloadTooLarge
                } else {
                    debug!(target: "gw.services.upstream", error = %e, "Failed to read request body");
                    GatewayError::InvalidRequestBody
                }
            })?;

        let url = match parts.uri.query() {
            Some(query) => format!("{}{}?{}", route.upstream, route.forward_path, query),
            None => format!("{}{}", route.upstream, route.forward_path),
        };

        let mut headers = strip_hop_by_hop(&parts.headers);
        // Recomputed by the client
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        let response = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "gw.services.upstream", error = %e, route = %route.prefix, "Upstream request failed");
                record_upstream_request(&route.prefix, "error", start.elapsed());
                let reason = if e.is_timeout() { "timeout" } else { "network" };
                GatewayError::UpstreamUnavailable(reason.to_string())
            })?;

        if response
            .content_length()
            .is_some_and(|len| len > MAX_RELAYED_BODY_BYTES as u64)
        {
            warn!(
                target: "gw.services.upstream",
                route = %route.prefix,
                content_length = response.content_length(),
                "Upstream response exceeds relay limit"
            );
            record_upstream_request(&route.prefix, "error", start.elapsed());
            return Err(GatewayError::UpstreamUnavailable(
                "response too large".to_string(),
            ));
        }

        let status = response.status();
        let mut response_headers = strip_hop_by_hop(response.headers());
        // Body is re-framed as it streams through
        response_headers.remove(header::CONTENT_LENGTH);

        record_upstream_request(&route.prefix, "success", start.elapsed());

        // Undeclared lengths are cut off at the cap mid-stream
        let body = Body::new(Limited::new(
            Body::from_stream(response.bytes_stream()),
            MAX_RELAYED_BODY_BYTES,
        ));

        Ok((status, response_headers, body).into_response())
    }
}

/// Whether a body read failed on the size cap rather than on the body itself.
fn exceeded_length_limit(err: &axum::Error) -> bool {
    std::error::Error::source(err).is_some_and(|source| source.is::<LengthLimitError>())
}

/// Copy `headers` without hop-by-hop entries, including any named in
/// `Connection`.
fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let connection_listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || connection_listed.iter().any(|n| n == name.as_str())
        {
            continue;
        }
        filtered.append(name.clone(), value.clone());
    }
    filtered
}
