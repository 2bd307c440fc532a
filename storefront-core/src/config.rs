//! Configuration loading and validation

use crate::error::{StorefrontError, StorefrontResult};
use crate::types::{BackendSettings, StorageSettings, StorefrontConfig};

use std::path::Path;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8000";

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings {
                base_url: DEFAULT_API_URL.to_string(),
                timeout_seconds: 10,
                user_agent: "storefront/0.1".to_string(),
            },
            storage: StorageSettings {
                data_dir: dirs::data_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join("storefront"),
            },
            logging: crate::logging::LoggingConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> StorefrontResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::config_error!("Failed to read config file", "config", e))?;

        let mut config: StorefrontConfig = toml::from_str(&content)
            .map_err(|e| crate::config_error!("Failed to parse config", "config", e))?;

        config.apply_env_overrides();
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> StorefrontResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::config_error!("Failed to serialize config", "config", e))?;

        std::fs::write(path, content)
            .map_err(|e| crate::config_error!("Failed to write config file", "config", e))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                self.backend.base_url = url;
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> StorefrontResult<()> {
        if url::Url::parse(&self.backend.base_url).is_err() {
            return Err(StorefrontError::Config {
                message: format!("Invalid backend base URL: {}", self.backend.base_url),
                source: None,
                context: crate::ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set backend.base_url to an absolute http(s) URL"),
            });
        }

        if self.backend.timeout_seconds == 0 {
            return Err(StorefrontError::Config {
                message: "Backend timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: crate::ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set backend.timeout_seconds to a positive value"),
            });
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(StorefrontError::Config {
                message: "Storage data_dir must not be empty".to_string(),
                source: None,
                context: crate::ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set storage.data_dir to a writable directory"),
            });
        }

        Ok(())
    }
}
