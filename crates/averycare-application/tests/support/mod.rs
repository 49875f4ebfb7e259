//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use averycare_application::{Notification, Store};
use averycare_core::api::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
use averycare_core::{AveryError, Result};
use averycare_infrastructure::MemoryKeyValueStore;
use serde_json::{Value, json};

#[derive(Clone)]
enum Reply {
    Status(u16, Value),
    Unreachable(String),
}

#[derive(Clone)]
struct Scripted {
    reply: Reply,
    delay: Option<Duration>,
}

/// Transport answering from a script keyed by `METHOD path`.
///
/// Replies queued for one route are handed out in order; the last one is
/// repeated. Every request is recorded, including the bearer token.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn route_key(method: HttpMethod, path: &str) -> String {
    format!("{} {}", method, path)
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, method: HttpMethod, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry(route_key(method, path))
            .or_default()
            .push_back(scripted);
    }

    pub fn on(&self, method: HttpMethod, path: &str, status: u16, body: Value) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Status(status, body),
                delay: None,
            },
        );
        self
    }

    pub fn on_delayed(
        &self,
        method: HttpMethod,
        path: &str,
        delay: Duration,
        status: u16,
        body: Value,
    ) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Status(status, body),
                delay: Some(delay),
            },
        );
        self
    }

    pub fn on_unreachable(&self, method: HttpMethod, path: &str, message: &str) -> &Self {
        self.push(
            method,
            path,
            Scripted {
                reply: Reply::Unreachable(message.to_string()),
                delay: None,
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let key = route_key(request.method, &request.path);
        self.requests.lock().unwrap().push(request);

        let scripted = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        let Some(scripted) = scripted else {
            return Ok(ApiResponse::new(
                404,
                json!({"success": false, "message": format!("no route for {}", key)}),
            ));
        };

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        match scripted.reply {
            Reply::Status(status, body) => Ok(ApiResponse::new(status, body)),
            Reply::Unreachable(message) => Err(AveryError::transport(message)),
        }
    }
}

pub fn empty_storage() -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

/// Storage holding a logged-in user session with token `t1`.
pub fn user_storage() -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::with_entries([
        ("token", "t1".to_string()),
        (
            "user",
            json!({"_id": "u1", "name": "Asha", "email": "asha@example.com", "token": "t1"})
                .to_string(),
        ),
    ]))
}

/// Storage holding an admin session with token `adm`.
pub fn admin_storage() -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::with_entries([
        ("adminToken", "adm".to_string()),
        ("adminEmail", json!("ops@example.com").to_string()),
    ]))
}

pub fn store_with(transport: &Arc<MockTransport>, storage: &Arc<MemoryKeyValueStore>) -> Store {
    Store::new(transport.clone(), storage.clone())
}

/// Everything notified so far.
pub fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}

/// A page of family members shaped like the user-facing list endpoint.
pub fn family_page(ids: &[&str], total: u64, page: u32, limit: u32) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"_id": id, "name": format!("Member {}", id), "relationship": "Parent"}))
        .collect();
    json!({
        "data": data,
        "meta": {"total": total, "page": page, "limit": limit, "remaining": 0, "hasNextPage": false}
    })
}

/// A `{data, total, page, limit}` list of pending calls.
pub fn calls_page(ids: &[&str], total: u64, page: u32, limit: u32) -> Value {
    let data: Vec<Value> = ids
        .iter()
        .map(|id| json!({"_id": id, "recipientName": "Ravi", "recipientNumber": "+911", "status": "pending"}))
        .collect();
    json!({"data": data, "total": total, "page": page, "limit": limit})
}
