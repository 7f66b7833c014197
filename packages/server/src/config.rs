use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Verified ID Request Service base URL
pub const MS_IDENTITY_HOST_NAME: &str = "https://verifiedid.did.msidentity.com/v1.0/";

/// Scope for the Verified ID service principal (client-credential `.default`)
pub const VERIFIED_ID_SCOPE: &str = "3db474b9-6a0c-4840-96ac-1fceb342124f/.default";

/// App role the client needs to call the Request Service
pub const REQUIRED_ROLE: &str = "VerifiableCredential.Create.All";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub verifier_authority: Option<String>,
    pub credential_type: Option<String>,
    /// Generated per process; callbacks from the Request Service carry it back
    pub api_key: String,
    pub authority_host: String,
    pub ms_identity_host_name: String,
    pub port: u16,
    pub public_dir: PathBuf,
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(env::vars().collect())
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            tenant_id: get("azTenantId").context("azTenantId must be set")?,
            client_id: get("azClientId").context("azClientId must be set")?,
            client_secret: get("azClientSecret").context("azClientSecret must be set")?,
            verifier_authority: get("VerifierAuthority"),
            credential_type: get("CredentialType"),
            api_key: uuid::Uuid::new_v4().to_string(),
            authority_host: get("AZ_AUTHORITY_HOST")
                .unwrap_or_else(|| entra_client::DEFAULT_AUTHORITY_HOST.to_string())
                .trim_end_matches('/')
                .to_string(),
            ms_identity_host_name: MS_IDENTITY_HOST_NAME.to_string(),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
            session_ttl: Duration::from_secs(
                get("SESSION_TTL_SECS")
                    .unwrap_or_else(|| "86400".to_string())
                    .parse()
                    .context("SESSION_TTL_SECS must be a number of seconds")?,
            ),
        })
    }

    /// Identity provider authority for the tenant
    pub fn authority(&self) -> String {
        format!("{}/{}", self.authority_host, self.tenant_id)
    }
}
