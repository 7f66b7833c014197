//! Test harness for integration testing.
//!
//! Starts a mock Entra ID token endpoint and the real application router on
//! ephemeral local ports. Each test gets its own servers and public directory.

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use server_core::server::{build_app, AppState};
use server_core::Config;
use std::collections::HashMap;
use std::net::SocketAddr;
use tempfile::TempDir;

use super::fixtures;

/// How the mock token endpoint answers
#[derive(Clone, Debug)]
pub enum TokenBehavior {
    /// 200 with a token carrying these roles
    Grant(Vec<String>),
    /// 401 with an AAD `invalid_client` error body
    Reject,
}

/// Test harness that manages test infrastructure.
///
/// # Example
///
/// ```ignore
/// #[tokio::test]
/// async fn my_test() {
///     let harness = TestHarness::new().await.unwrap();
///     let response = harness.get("/echo").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Shared state handed to the router
    pub state: AppState,
    /// Base URL of the running application
    pub base_url: String,
    /// Base URL of the mock identity platform
    pub authority_host: String,
    /// HTTP client for requests against the application
    pub client: reqwest::Client,
    // Keep the public directory alive for the test
    _public_dir: TempDir,
}

impl TestHarness {
    /// Harness whose token endpoint grants the Verified ID role.
    pub async fn new() -> Result<Self> {
        Self::with_token_behavior(TokenBehavior::Grant(vec![
            server_core::REQUIRED_ROLE.to_string(),
        ]))
        .await
    }

    /// Creates a new test harness.
    ///
    /// This will:
    /// 1. Write a sample `index.html` into a temporary public directory
    /// 2. Start the mock token endpoint
    /// 3. Start the application router pointed at the mock
    pub async fn with_token_behavior(behavior: TokenBehavior) -> Result<Self> {
        // Initialize tracing subscriber to respect RUST_LOG environment variable.
        // Uses try_init() to avoid panicking if already initialized.
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let public_dir = tempfile::tempdir().context("Failed to create public dir")?;
        std::fs::write(public_dir.path().join("index.html"), fixtures::INDEX_HTML)
            .context("Failed to write index.html")?;
        std::fs::write(public_dir.path().join("styles.css"), fixtures::STYLES_CSS)
            .context("Failed to write styles.css")?;

        let authority_host = spawn_token_endpoint(behavior).await?;

        let vars: HashMap<String, String> = [
            ("azTenantId", fixtures::TENANT_ID),
            ("azClientId", fixtures::CLIENT_ID),
            ("azClientSecret", fixtures::CLIENT_SECRET),
            ("VerifierAuthority", fixtures::VERIFIER_AUTHORITY),
            ("CredentialType", "VerifiedEmployee"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain([
            ("AZ_AUTHORITY_HOST".to_string(), authority_host.clone()),
            (
                "PUBLIC_DIR".to_string(),
                public_dir.path().display().to_string(),
            ),
        ])
        .collect();

        let config = Config::from_vars(vars)?;
        let state = AppState::new(config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind application")?;
        let addr = listener.local_addr()?;
        let app = build_app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            state,
            base_url: format!("http://{}", addr),
            authority_host,
            client: reqwest::Client::new(),
            _public_dir: public_dir,
        })
    }

    /// GET a path on the application.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Request to test server failed")
    }
}

/// Start a mock `/{tenant}/oauth2/v2.0/token` endpoint, returning its base URL.
async fn spawn_token_endpoint(behavior: TokenBehavior) -> Result<String> {
    let path = format!("/{}/oauth2/v2.0/token", fixtures::TENANT_ID);
    let app = Router::new().route(
        &path,
        post(move || {
            let behavior = behavior.clone();
            async move { token_response(&behavior) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind token endpoint")?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}

fn token_response(behavior: &TokenBehavior) -> (StatusCode, Json<Value>) {
    match behavior {
        TokenBehavior::Grant(roles) => (
            StatusCode::OK,
            Json(json!({
                "token_type": "Bearer",
                "expires_in": 3599,
                "access_token": fixtures::access_token(roles),
            })),
        ),
        TokenBehavior::Reject => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_client",
                "error_description": "AADSTS7000215: Invalid client secret provided.",
            })),
        ),
    }
}
