use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "pteroctl";

/// API tokens in the OS keychain, one entry per panel URL.
pub struct CredentialStore;

impl CredentialStore {
    pub fn store_token(panel_url: &str, token: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, panel_url)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(token)
            .context("Failed to store API token in keychain")?;
        Ok(())
    }

    pub fn get_token(panel_url: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, panel_url)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve API token from keychain")
    }

    pub fn delete_token(panel_url: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, panel_url)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete API token from keychain")?;
        Ok(())
    }
}
