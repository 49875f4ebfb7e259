//! Configuration service.
//!
//! Loads the client configuration from `~/.config/averycare/config.toml`,
//! writing a default file on first use, and applies the environment
//! override for the API base URL.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use averycare_core::config::{API_URL_ENV, ClientConfig};
use averycare_core::Result;

use crate::paths::AveryPaths;
use crate::storage::AtomicFile;

/// Loads and caches the [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    env_override: Option<String>,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Service over the default config file, honouring `AVERYCARE_API_URL`.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(
            AveryPaths::config_file()?,
            std::env::var(API_URL_ENV).ok(),
        ))
    }

    pub fn with_path(path: PathBuf, env_override: Option<String>) -> Self {
        Self {
            path,
            env_override,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Returns the configuration, loading it from disk if not cached.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let cached = self
                .config
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut cached = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = None;
    }

    fn load_config(&self) -> Result<ClientConfig> {
        let file = AtomicFile::new(self.path.clone());

        let mut config = match file.read()? {
            Some(content) => toml::from_str(&content)?,
            None => {
                let config = ClientConfig::default();
                file.write(&toml::to_string_pretty(&config)?)?;
                tracing::info!("Created default config at {}", self.path.display());
                config
            }
        };

        config.override_api_base_url(self.env_override.clone());
        tracing::debug!(api_base_url = %config.api_base_url, "Loaded client config");
        Ok(config)
    }
}
