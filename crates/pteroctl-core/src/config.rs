//! Client configuration: the panel base URL and the application API token.
//!
//! Both values are required. The URL is stored verbatim and only checked
//! for well-formedness when a request is built.

use crate::api::ApiError;

/// Environment variable holding the panel base URL
pub const URL_ENV: &str = "PTERODACTYL_URL";

/// Environment variable holding the application API token
pub const TOKEN_ENV: &str = "PTERODACTYL_TOKEN";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    token: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let token = token.into();
        if base_url.trim().is_empty() {
            return Err(ApiError::Configuration("base URL is required".into()));
        }
        if token.trim().is_empty() {
            return Err(ApiError::Configuration("API token is required".into()));
        }
        Ok(Self { base_url, token })
    }

    /// Read the configuration from `PTERODACTYL_URL` and `PTERODACTYL_TOKEN`.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var(URL_ENV).unwrap_or_default();
        let token = std::env::var(TOKEN_ENV).unwrap_or_default();
        Self::new(base_url, token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
