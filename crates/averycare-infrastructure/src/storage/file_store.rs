use std::collections::BTreeMap;
use std::path::PathBuf;

use averycare_core::storage::KeyValueStore;
use averycare_core::{AveryError, Result};

use crate::paths::AveryPaths;
use crate::storage::atomic_file::AtomicFile;

/// Durable key-value storage backed by one JSON object on disk.
///
/// Every call reads the file afresh, so several processes sharing the file
/// observe each other's writes. Mutations run under an exclusive file lock.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    file: AtomicFile,
}

impl FileKeyValueStore {
    /// Opens the store at the default location (`~/.local/share/averycare/session.json`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(AveryPaths::storage_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    fn parse(content: Option<String>) -> Result<BTreeMap<String, String>> {
        match content {
            Some(content) => serde_json::from_str(&content)
                .map_err(|e| AveryError::storage(format!("Corrupt storage file: {}", e))),
            None => Ok(BTreeMap::new()),
        }
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        self.file.update(|content| {
            let mut entries = Self::parse(content)?;
            f(&mut entries);
            Ok(serde_json::to_string_pretty(&entries)?)
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = Self::parse(self.file.read()?)?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use averycare_core::session::{Principal, Session, TokenStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");

        let store = FileKeyValueStore::with_path(path.clone());
        store.set("token", "t1").unwrap();
        store.set("adminToken", "a1").unwrap();
        store.remove("adminToken").unwrap();

        let reopened = FileKeyValueStore::with_path(path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("t1"));
        assert!(reopened.get("adminToken").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_path(temp_dir.path().join("session.json"));
        store.remove("nothing").unwrap();
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileKeyValueStore::with_path(path).get("token").unwrap_err();
        assert!(matches!(err, AveryError::Storage(_)));
    }

    #[test]
    fn test_token_store_roundtrip_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let storage: Arc<dyn KeyValueStore> =
            Arc::new(FileKeyValueStore::with_path(temp_dir.path().join("session.json")));
        let store = TokenStore::new(Principal::User, storage);

        let session = Session {
            name: Some("A".into()),
            role: Some("admin".into()),
            token: Some("t1".into()),
            ..Default::default()
        };
        store.set("t1", &session).unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("session.json")).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        let blob: serde_json::Value = serde_json::from_str(&entries["user"]).unwrap();
        assert_eq!(blob["token"], "t1");
        assert_eq!(blob["role"], "admin");
    }
}
