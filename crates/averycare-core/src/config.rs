use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://avery-care-backend-3.onrender.com/api";

/// Environment variable overriding [`ClientConfig::api_base_url`].
pub const API_URL_ENV: &str = "AVERYCARE_API_URL";

/// Client settings read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout. No timeout when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Location of the durable session file. Defaults to the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
            storage_file: None,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Replaces the base URL when `value` is non-blank.
    pub fn override_api_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }
}
