//! Unified path management for AveryCare client files.
//!
//! ```text
//! ~/.config/averycare/         # Config directory
//! └── config.toml              # Client configuration
//!
//! ~/.local/share/averycare/    # Data directory
//! └── session.json             # Durable key-value storage (tokens, identities)
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "averycare";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for averycare_core::AveryError {
    fn from(e: PathError) -> Self {
        averycare_core::AveryError::config(e.to_string())
    }
}

pub struct AveryPaths;

impl AveryPaths {
    /// Returns the configuration directory (e.g. `~/.config/averycare/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/averycare/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default location of the durable session storage.
    pub fn storage_file() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        let config_file = AveryPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = AveryPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("averycare"));
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_storage_file() {
        let storage_file = AveryPaths::storage_file().unwrap();
        assert!(storage_file.ends_with("session.json"));
        assert!(storage_file.starts_with(AveryPaths::data_dir().unwrap()));
    }
}
