//! Per-principal credential storage.

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::session::Principal;
use crate::storage::KeyValueStore;

/// Durable storage for one principal's bearer token and display identity.
///
/// Two instances exist at runtime, one per [`Principal`]. They share the
/// backing [`KeyValueStore`] but never touch each other's keys.
#[derive(Clone)]
pub struct TokenStore {
    principal: Principal,
    storage: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    pub fn new(principal: Principal, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { principal, storage }
    }

    pub fn principal(&self) -> Principal {
        self.principal
    }

    /// Overwrites the stored credential and identity for this principal.
    pub fn set<I: Serialize>(&self, token: &str, identity: &I) -> Result<()> {
        let identity = serde_json::to_string(identity)?;
        self.clear()?;
        self.storage.set(self.principal.token_key(), token)?;
        self.storage.set(self.principal.identity_key(), &identity)?;
        Ok(())
    }

    /// Replaces only the identity; the stored token is kept.
    pub fn set_identity<I: Serialize>(&self, identity: &I) -> Result<()> {
        let identity = serde_json::to_string(identity)?;
        self.storage.set(self.principal.identity_key(), &identity)
    }

    /// Returns the stored bearer token. Empty values count as absent.
    pub fn get(&self) -> Option<String> {
        match self.storage.get(self.principal.token_key()) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                tracing::warn!(principal = %self.principal, "Failed to read token: {}", e);
                None
            }
        }
    }

    /// Returns the stored identity.
    ///
    /// Unparseable blobs (including the literal `undefined` a broken writer
    /// may have left behind) are treated as absent.
    pub fn identity<I: DeserializeOwned>(&self) -> Option<I> {
        let raw = match self.storage.get(self.principal.identity_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(principal = %self.principal, "Failed to read identity: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(principal = %self.principal, "Ignoring unparseable identity: {}", e);
                None
            }
        }
    }

    /// Removes the credential and identity. Local only, nothing is revoked
    /// on the backend.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(self.principal.token_key())?;
        self.storage.remove(self.principal.identity_key())?;
        Ok(())
    }
}
