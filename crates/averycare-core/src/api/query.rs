//! Query-string building with the sparse convention: empty or absent values
//! are omitted so the backend's own defaults apply.

use serde::Serialize;

/// Ordered list of query parameters that skips empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SparseQuery(Vec<(String, String)>);

impl SparseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key=value` unless the value is empty after trimming.
    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        if !value.trim().is_empty() {
            self.0.push((key.to_string(), value));
        }
        self
    }

    /// Appends `key=value` when the value is present and non-empty.
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Appends a positive number. Zero means "unset" for page cursors.
    pub fn push_positive(&mut self, key: &str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value.filter(|v| *v > 0) {
            self.push(key, value);
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.0
    }
}
