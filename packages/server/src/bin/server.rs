//! Verifier sample HTTP server
//!
//! Serves the sample pages and the echo endpoint, and checks access to the
//! Verified ID Request Service in the background.

use anyhow::{Context, Result};
use server_core::kernel::{mask, mask_secret, verify_service_access};
use server_core::server::{build_app, AppState};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,server_core=debug,entra_client=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Verified ID verifier sample");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Debug: log masked env vars for deployment troubleshooting
    fn mask_env(name: &str, mask: fn(&str) -> String) {
        match std::env::var(name) {
            Ok(val) if val.is_empty() => tracing::info!("  {}: (empty)", name),
            Ok(val) => tracing::info!("  {}: {}", name, mask(&val)),
            Err(_) => tracing::warn!("  {}: NOT SET", name),
        }
    }
    tracing::info!("Environment variables:");
    mask_env("azTenantId", mask);
    mask_env("azClientId", mask);
    mask_env("azClientSecret", mask_secret);
    tracing::info!("  VerifierAuthority: {:?}", config.verifier_authority);
    tracing::info!("  CredentialType: {:?}", config.credential_type);
    tracing::info!("  Authority: {}", config.authority());
    tracing::info!("  Request Service: {}", config.ms_identity_host_name);

    let port = config.port;
    let state = AppState::new(config);

    // Check token acquisition in the background; the server listens either way
    let entra = state.entra.clone();
    let token_request = state.token_request.clone();
    let check_config = state.config.clone();
    tokio::spawn(async move {
        // Errors are logged inside the check
        let _ = verify_service_access(&entra, &token_request, &check_config).await;
    });

    let app = build_app(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Verifier sample listening on port {}", port);
    tracing::info!("Echo: http://localhost:{}/echo", port);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
