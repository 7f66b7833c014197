//! Error types for the Entra ID client.

use thiserror::Error;

/// Result type for Entra ID client operations.
pub type Result<T> = std::result::Result<T, EntraError>;

/// Entra ID client errors.
#[derive(Debug, Error)]
pub enum EntraError {
    /// Configuration error (missing tenant, empty scope list)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Token endpoint returned a non-2xx response
    #[error("Token endpoint error ({status}): {code}: {description}")]
    Api {
        status: u16,
        code: String,
        description: String,
    },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Access token is not a well-formed JWT
    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}
