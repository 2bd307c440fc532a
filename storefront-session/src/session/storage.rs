//! Durable credential storage
//!
//! One token string in a fixed-name file under the data directory, the
//! client-side counterpart of the backend's issued bearer token. The user
//! record is never persisted; it is re-derived from the backend on startup.

use std::path::{Path, PathBuf};
use storefront_core::{storage_error, StorefrontResult};
use tracing::{debug, info};

const TOKEN_FILE: &str = "token";

/// File-backed store for the persisted credential token
pub struct CredentialStore {
    token_path: PathBuf,
}

impl CredentialStore {
    /// Create a store rooted at the given data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> StorefrontResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&data_dir)
            .map_err(|e| storage_error!("Failed to create data directory", "credential_store", e))?;

        info!("Credential store initialized at: {}", data_dir.display());

        Ok(Self {
            token_path: data_dir.join(TOKEN_FILE),
        })
    }

    /// Load the persisted token, if one exists
    pub fn load(&self) -> StorefrontResult<Option<String>> {
        if !self.token_path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.token_path)
            .map_err(|e| storage_error!("Failed to read token file", "credential_store", e))?;

        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }

        debug!("Loaded persisted token from {}", self.token_path.display());
        Ok(Some(token.to_string()))
    }

    /// Persist a token, replacing any previous one
    pub fn save(&self, token: &str) -> StorefrontResult<()> {
        std::fs::write(&self.token_path, token)
            .map_err(|e| storage_error!("Failed to write token file", "credential_store", e))?;

        debug!("Persisted token to {}", self.token_path.display());
        Ok(())
    }

    /// Remove the persisted token. Missing file is not an error.
    pub fn clear(&self) -> StorefrontResult<()> {
        if self.token_path.exists() {
            std::fs::remove_file(&self.token_path)
                .map_err(|e| storage_error!("Failed to remove token file", "credential_store", e))?;
            debug!("Removed persisted token at {}", self.token_path.display());
        }
        Ok(())
    }
}
