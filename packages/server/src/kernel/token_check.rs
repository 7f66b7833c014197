use entra_client::{AccessTokenClaims, ClientCredentialRequest, EntraClient, EntraError};
use thiserror::Error;
use tracing::{error, info};

use crate::config::{Config, REQUIRED_ROLE};

/// Startup check failures
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Could not acquire access token. Check your configuration for tenant {tenant_id} and clientId {client_id}: {source}")]
    TokenAcquisition {
        tenant_id: String,
        client_id: String,
        #[source]
        source: EntraError,
    },

    #[error("Access token does not have the required scope '{0}'")]
    MissingRole(String),
}

/// Check that an access token can be acquired and that it carries the app
/// role needed to call the Verified ID Request Service.
///
/// Failures are logged here; the caller decides whether to carry on.
pub async fn verify_service_access(
    entra: &EntraClient,
    request: &ClientCredentialRequest,
    config: &Config,
) -> Result<AccessTokenClaims, StartupError> {
    let result = check(entra, request, config).await;

    if let Err(e) = &result {
        error!(error = %e, "Verified ID service access check failed");
    }

    result
}

async fn check(
    entra: &EntraClient,
    request: &ClientCredentialRequest,
    config: &Config,
) -> Result<AccessTokenClaims, StartupError> {
    let acquisition_error = |source| StartupError::TokenAcquisition {
        tenant_id: config.tenant_id.clone(),
        client_id: config.client_id.clone(),
        source,
    };

    let token = entra
        .acquire_token_by_client_credential(request)
        .await
        .map_err(acquisition_error)?;

    info!(
        access_token = %mask(&token.access_token),
        expires_on = %token.expires_on,
        "Acquired access token"
    );

    let claims =
        AccessTokenClaims::decode_unverified(&token.access_token).map_err(acquisition_error)?;

    if !claims.has_role(REQUIRED_ROLE) {
        return Err(StartupError::MissingRole(REQUIRED_ROLE.to_string()));
    }

    info!(role = REQUIRED_ROLE, "Access token has the required role");
    Ok(claims)
}

/// Characters of a value `mask` may reveal
const MASK_VISIBLE_CHARS: usize = 4;

/// Show at most the first four characters of a value and its length
///
/// Values shorter than 16 characters reveal a quarter of their length.
pub fn mask(value: &str) -> String {
    let len = value.chars().count();
    let visible = (len / 4).min(MASK_VISIBLE_CHARS);
    let prefix: String = value.chars().take(visible).collect();
    format!(
        "{}{} ({} chars)",
        prefix,
        "*".repeat((len - visible).min(16)),
        len
    )
}

/// Describe a secret by its length only
pub fn mask_secret(value: &str) -> String {
    format!("({} chars)", value.chars().count())
}
