//! Spawns a real gateway on an ephemeral port.

use api_gateway::config::Config;
use api_gateway::routes::{build_routes, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct TestGateway {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Spawn a gateway from environment-style variables.
    ///
    /// `AUTH_SERVICE_URL` must be present in `vars`.
    pub async fn spawn(vars: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let config = Config::from_vars(&vars)?;
        let state = Arc::new(AppState::from_config(&config)?);
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();
        let app = build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test gateway error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Gateway with one protected route `/api/patients` to `upstream_url`.
    pub async fn with_patients_route(
        auth_url: &str,
        upstream_url: &str,
    ) -> Result<Self, anyhow::Error> {
        Self::spawn(HashMap::from([
            ("AUTH_SERVICE_URL".to_string(), auth_url.to_string()),
            (
                "GATEWAY_ROUTES".to_string(),
                format!("/api/patients={}", upstream_url),
            ),
            ("AUTH_VALIDATION_TIMEOUT_MS".to_string(), "500".to_string()),
        ]))
        .await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

/// An address with nothing listening on it.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
