//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
        HeaderValue,
    },
    middleware,
    routing::get,
    Router,
};
use entra_client::{ClientCredentialRequest, EntraClient, EntraOptions};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::MemoryStore;

use crate::config::{Config, VERIFIED_ID_SCOPE};
use crate::server::auth::session_layer;
use crate::server::middleware::request_trace;
use crate::server::routes::{echo_handler, home_handler};

const CORS_ALLOW_HEADERS: &str = "Authorization, Origin, X-Requested-With, Content-Type, Accept";

/// Shared application state
///
/// Also carries what the credential request handlers need: the confidential
/// client, the client-credential request for the Request Service and the
/// session store used to correlate QR-code scans with browser sessions.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub entra: Arc<EntraClient>,
    pub token_request: ClientCredentialRequest,
    pub sessions: MemoryStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let entra = EntraClient::new(EntraOptions::new(
            config.tenant_id.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
        ))
        .with_authority_host(config.authority_host.clone());

        Self {
            config: Arc::new(config),
            entra: Arc::new(entra),
            token_request: ClientCredentialRequest::new([VERIFIED_ID_SCOPE]),
            sessions: MemoryStore::default(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir);
    let sessions = session_layer(state.sessions.clone(), state.config.session_ttl);

    Router::new()
        .route("/", get(home_handler))
        .route("/echo", get(echo_handler))
        .route_layer(middleware::from_fn(request_trace))
        // Static files never start a session
        .route_layer(sessions)
        // Everything else comes out of the public directory
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::if_not_present(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(CORS_ALLOW_HEADERS),
                )),
        )
        .with_state(state)
}
