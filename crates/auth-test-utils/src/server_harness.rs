//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real auth-service instances in tests,
//! backed by an in-memory identity store instead of Postgres.

use crate::crypto_fixtures::test_signing_key;
use auth_service::crypto::TokenCodec;
use auth_service::observability::metrics::init_metrics_recorder;
use auth_service::repositories::{Identity, InMemoryIdentityStore};
use auth_service::routes::{self, AppState};
use auth_service::services::{AuthService, BcryptComparator, CredentialVerifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Seed of the signing key every harness server uses.
pub const TEST_SIGNING_KEY_SEED: u8 = 1;

/// Test harness for spawning the auth service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_e2e() -> anyhow::Result<()> {
///     let server = TestAuthServer::spawn(vec![test_identity("a@b.com", "correct", "USER")]).await?;
///
///     let response = reqwest::Client::new()
///         .post(format!("{}/login", server.url()))
///         .json(&serde_json::json!({"identifier": "a@b.com", "secret": "correct"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    codec: Arc<TokenCodec>,
    store: Arc<InMemoryIdentityStore>,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server holding the given identities.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign tokens with the deterministic key for `TEST_SIGNING_KEY_SEED`
    /// - Start the HTTP server in the background
    pub async fn spawn(identities: Vec<Identity>) -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(InMemoryIdentityStore::new(identities)).await
    }

    /// Spawn a server over a caller-built store (e.g. `InMemoryIdentityStore::failing()`).
    pub async fn spawn_with_store(store: InMemoryIdentityStore) -> Result<Self, anyhow::Error> {
        let store = Arc::new(store);
        let codec = Arc::new(TokenCodec::new(&test_signing_key(TEST_SIGNING_KEY_SEED)));

        let verifier = CredentialVerifier::new(store.clone(), Arc::new(BcryptComparator));
        let state = Arc::new(AppState {
            auth_service: AuthService::new(verifier, codec.clone()),
        });

        // Only one recorder can be installed per process; later servers get a
        // standalone one.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            codec,
            store,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Codec sharing the server's signing key, for minting or inspecting tokens.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Number of identity lookups the server has made.
    pub fn lookup_count(&self) -> usize {
        self.store.lookup_count()
    }

    /// Log in over HTTP and return the issued token.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<String, anyhow::Error> {
        let response = reqwest::Client::new()
            .post(format!("{}/login", self.url()))
            .json(&serde_json::json!({ "identifier": identifier, "secret": secret }))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Login failed with status {}", response.status());
        }

        let body: serde_json::Value = response.json().await?;
        body.get("token")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Login response carried no token"))
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
