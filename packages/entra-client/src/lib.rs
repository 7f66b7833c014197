//! Microsoft Entra ID client-credential client
//!
//! A minimal confidential client for the OAuth2 client-credential grant
//! against the Microsoft identity platform v2.0 token endpoint. Tokens are
//! cached in memory per scope set until shortly before they expire.
//!
//! # Example
//!
//! ```rust,ignore
//! use entra_client::{AccessTokenClaims, ClientCredentialRequest, EntraClient, EntraOptions};
//!
//! let client = EntraClient::new(EntraOptions::new(tenant_id, client_id, client_secret));
//! let request = ClientCredentialRequest::new(["3db474b9-6a0c-4840-96ac-1fceb342124f/.default"]);
//!
//! let result = client.acquire_token_by_client_credential(&request).await?;
//! let claims = AccessTokenClaims::decode_unverified(&result.access_token)?;
//! ```

pub mod error;
pub mod types;

pub use error::{EntraError, Result};
pub use types::*;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Public cloud authority host.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

/// Cached tokens closer than this to expiry are refreshed.
const CACHE_EXPIRY_MARGIN_SECS: i64 = 300;

/// Confidential client credentials.
#[derive(Debug, Clone)]
pub struct EntraOptions {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority_host: String,
}

impl EntraOptions {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authority_host: DEFAULT_AUTHORITY_HOST.to_string(),
        }
    }
}

/// Entra ID confidential client.
#[derive(Clone)]
pub struct EntraClient {
    http_client: Client,
    options: EntraOptions,
    cache: Arc<Mutex<HashMap<String, AuthenticationResult>>>,
}

impl EntraClient {
    /// Create a new client for the given tenant and application.
    pub fn new(options: EntraOptions) -> Self {
        Self {
            http_client: Client::new(),
            options,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Set a custom authority host (sovereign clouds, local mocks).
    pub fn with_authority_host(mut self, host: impl Into<String>) -> Self {
        self.options.authority_host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Application (client) id.
    pub fn client_id(&self) -> &str {
        &self.options.client_id
    }

    /// Authority URL for the configured tenant.
    pub fn authority(&self) -> String {
        format!("{}/{}", self.options.authority_host, self.options.tenant_id)
    }

    /// OAuth2 v2.0 token endpoint for the configured tenant.
    pub fn token_endpoint(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.authority())
    }

    /// Acquire a token for the application itself.
    ///
    /// Served from cache unless `skip_cache` is set or the cached token is
    /// within five minutes of expiry.
    pub async fn acquire_token_by_client_credential(
        &self,
        request: &ClientCredentialRequest,
    ) -> Result<AuthenticationResult> {
        if request.scopes.is_empty() {
            return Err(EntraError::Config("at least one scope is required".into()));
        }

        let cache_key = cache_key(&request.scopes);

        if !request.skip_cache {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(&cache_key) {
                if cached.expires_in() > CACHE_EXPIRY_MARGIN_SECS {
                    debug!(scopes = %cache_key, "Serving access token from cache");
                    let mut result = cached.clone();
                    result.from_cache = true;
                    return Ok(result);
                }
            }
        }

        let result = self.request_token(request).await?;

        self.cache.lock().await.insert(cache_key, result.clone());

        Ok(result)
    }

    async fn request_token(&self, request: &ClientCredentialRequest) -> Result<AuthenticationResult> {
        let start = std::time::Instant::now();
        let scope = request.scope_param();

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.options.client_id.as_str()),
            ("client_secret", self.options.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self
            .http_client
            .post(self.token_endpoint())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Token request failed");
                EntraError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token endpoint error");
            let (code, description) = match serde_json::from_str::<TokenErrorRaw>(&error_text) {
                Ok(raw) => (raw.error, raw.error_description),
                Err(_) => ("unknown_error".to_string(), error_text),
            };
            return Err(EntraError::Api {
                status: status.as_u16(),
                code,
                description,
            });
        }

        let raw: TokenResponseRaw = response
            .json()
            .await
            .map_err(|e| EntraError::Parse(e.to_string()))?;

        if raw.access_token.is_empty() {
            return Err(EntraError::Parse("token response has an empty access_token".into()));
        }

        let expires_on = expiry_from_now(raw.expires_in)?;

        debug!(
            client_id = %self.options.client_id,
            expires_in = raw.expires_in,
            duration_ms = start.elapsed().as_millis(),
            "Acquired access token"
        );

        Ok(AuthenticationResult {
            access_token: raw.access_token,
            token_type: raw.token_type,
            expires_on,
            scopes: request.scopes.clone(),
            from_cache: false,
        })
    }
}

/// Absolute expiry for an `expires_in` lifetime in seconds
fn expiry_from_now(expires_in: i64) -> Result<DateTime<Utc>> {
    if expires_in < 0 {
        return Err(EntraError::Parse(format!("negative expires_in: {}", expires_in)));
    }
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| EntraError::Parse(format!("expires_in out of range: {}", expires_in)))
}

fn cache_key(scopes: &[String]) -> String {
    let mut sorted: Vec<&str> = scopes.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(" ")
}
