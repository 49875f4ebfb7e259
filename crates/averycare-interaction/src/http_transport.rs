//! ReqwestTransport - REST client for the AveryCare backend.
//!
//! Sends [`ApiRequest`]s relative to the configured API base URL and hands
//! back the status plus the JSON body. Error statuses are not errors at this
//! level; the orchestrators decide what a non-2xx answer means.

use std::time::Duration;

use async_trait::async_trait;
use averycare_core::api::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
use averycare_core::config::ClientConfig;
use averycare_core::{AveryError, Result};
use reqwest::{Client, Method};
use serde_json::Value;

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone()).with_timeout(config.request_timeout())
    }

    /// Sets the per-request timeout. `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Decodes a response body; non-JSON text is kept as a JSON string.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        tracing::debug!(method = %request.method, %url, "Sending backend request");

        let mut builder = self.client.request(Self::method(request.method), &url);

        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(token) = &request.bearer {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AveryError::transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AveryError::transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %url, "Backend returned error status");
        }

        Ok(ApiResponse::new(status.as_u16(), decode_body(&text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_join() {
        let transport = ReqwestTransport::new("http://localhost:4000/api/");
        assert_eq!(
            transport.url_for("/calls/getScheduledCalls"),
            "http://localhost:4000/api/calls/getScheduledCalls"
        );
        assert_eq!(
            transport.url_for("family/m1"),
            "http://localhost:4000/api/family/m1"
        );
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(""), Value::Null);
        assert_eq!(decode_body("{\"ok\":true}"), json!({"ok": true}));
        assert_eq!(decode_body("Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            request_timeout_secs: Some(7),
            ..Default::default()
        };
        let transport = ReqwestTransport::from_config(&config);
        assert_eq!(transport.base_url(), config.api_base_url);
        assert_eq!(transport.timeout, Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = ReqwestTransport::new("http://127.0.0.1:9/api")
            .with_timeout(Some(Duration::from_secs(5)));
        let err = transport
            .send(ApiRequest::get("family/fetchFamilyMembers"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
