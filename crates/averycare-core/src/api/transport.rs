//! Transport seam between the effect orchestrators and the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::SparseQuery;
use crate::error::{AveryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One outgoing backend call, relative to the configured API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the API base, e.g. `calls/getScheduledCalls`.
    pub path: String,
    pub query: SparseQuery,
    pub body: Option<Value>,
    /// Bearer token sent as `Authorization: Bearer <token>`.
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: SparseQuery::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_query(mut self, query: SparseQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.with_body(serde_json::to_value(body)?))
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// Raw backend answer: HTTP status plus the decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// The body's `message` field, if it carries a non-empty one.
    pub fn message(&self) -> Option<String> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
    }

    /// Whether the body explicitly reports `success: false`.
    pub fn reports_failure(&self) -> bool {
        matches!(self.body.get("success"), Some(Value::Bool(false)))
    }

    /// Converts an error status or a `{success: false}` body into
    /// [`AveryError::Server`], otherwise returns the body.
    pub fn into_result(self) -> Result<Value> {
        if !(200..300).contains(&self.status) || self.reports_failure() {
            return Err(AveryError::server(Some(self.status), self.message()));
        }
        Ok(self.body)
    }
}

/// Sends [`ApiRequest`]s to the backend.
///
/// Implementations return `Err` only when no HTTP answer was obtained
/// (transport failure); error statuses come back as an [`ApiResponse`].
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
