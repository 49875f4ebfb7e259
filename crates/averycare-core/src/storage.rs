//! Durable key-value storage trait.

use crate::error::Result;

/// String key-value storage that survives restarts.
///
/// The interface is synchronous on purpose: the store reads it before the
/// state tree is built, so an authenticated user never sees a logged-out
/// first frame.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
