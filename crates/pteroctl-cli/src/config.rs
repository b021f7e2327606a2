//! CLI settings management.
//!
//! Settings hold the last panel URL used with `pteroctl login`. They are
//! stored at `~/.config/pteroctl/config.json`. The API token itself lives in
//! the OS keychain (see `credentials`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use pteroctl_core::config::{TOKEN_ENV, URL_ENV};
use pteroctl_core::ClientConfig;
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;

/// Application name used for the config directory path
const APP_NAME: &str = "pteroctl";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    pub panel_url: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse settings file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the client configuration. Environment variables win over the
    /// settings file and the keychain.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let url = resolve(std::env::var(URL_ENV).ok(), || self.panel_url.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("No panel URL. Run `pteroctl login <url>` or set {}", URL_ENV)
            })?;
        let token = resolve(std::env::var(TOKEN_ENV).ok(), || {
            CredentialStore::get_token(&url).ok()
        })
        .ok_or_else(|| {
            anyhow::anyhow!("No API token for {}. Run `pteroctl login` or set {}", url, TOKEN_ENV)
        })?;
        Ok(ClientConfig::new(url, token)?)
    }
}

/// First non-blank value, falling back lazily.
fn resolve(primary: Option<String>, fallback: impl FnOnce() -> Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(fallback)
        .filter(|v| !v.trim().is_empty())
}
