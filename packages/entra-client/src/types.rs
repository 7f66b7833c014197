//! Token endpoint request and response types.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EntraError, Result};

// =============================================================================
// Client Credential Request
// =============================================================================

/// Parameters for a client-credential token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentialRequest {
    /// Scopes to request, e.g. `"<resource>/.default"`
    pub scopes: Vec<String>,

    /// Always go to the token endpoint, ignoring any cached token
    pub skip_cache: bool,
}

impl ClientCredentialRequest {
    /// Create a request for the given scopes that may be served from cache.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            skip_cache: false,
        }
    }

    /// Set whether the token cache is bypassed.
    pub fn skip_cache(mut self, skip_cache: bool) -> Self {
        self.skip_cache = skip_cache;
        self
    }

    /// Space-delimited scope string as sent on the wire.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

// =============================================================================
// Token Endpoint Responses
// =============================================================================

/// Successful token endpoint response (RFC 6749 section 5.1).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponseRaw {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Error body returned by the Microsoft identity platform.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenErrorRaw {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

/// Result of a token acquisition.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub token_type: String,
    pub expires_on: DateTime<Utc>,
    pub scopes: Vec<String>,
    /// True when served from the in-memory cache
    pub from_cache: bool,
}

impl AuthenticationResult {
    /// Seconds until the token expires (negative once expired).
    pub fn expires_in(&self) -> i64 {
        self.expires_on
            .signed_duration_since(Utc::now())
            .num_seconds()
    }
}

// =============================================================================
// Access Token Claims
// =============================================================================

/// Claims read from an access token payload.
///
/// Decoding does not validate the signature. The token came straight from the
/// token endpoint over TLS; this is only used to inspect granted roles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub tid: Option<String>,
    #[serde(default)]
    pub appid: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl AccessTokenClaims {
    /// Decode the payload segment of a JWT without verifying it.
    pub fn decode_unverified(token: &str) -> Result<Self> {
        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                return Err(EntraError::InvalidToken(
                    "expected three dot-separated segments".into(),
                ))
            }
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| EntraError::InvalidToken(format!("payload is not base64url: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| EntraError::InvalidToken(format!("payload is not JSON claims: {}", e)))
    }

    /// Whether the token grants the given application role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
