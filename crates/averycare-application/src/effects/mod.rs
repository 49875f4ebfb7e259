//! Effect orchestrators: one per slice.
//!
//! Each orchestrator turns a request action into exactly one backend call
//! and exactly one terminal action, followed by any cascading refetch.

mod admin_auth;
mod auth;
mod call;
mod family;
mod users;

use averycare_core::action::Action;
use averycare_core::api::ApiRequest;
use averycare_core::session::Principal;
use averycare_core::state::RootState;
use averycare_core::{AveryError, Result};
use serde_json::Value;

use crate::notification::Notification;
use crate::store::Store;

/// Routes a request action to the orchestrator of its slice.
pub(crate) async fn run(scope: &EffectScope, action: Action) {
    match action {
        Action::Auth(action) => auth::run(scope, action).await,
        Action::AdminAuth(action) => admin_auth::run(scope, action).await,
        Action::Family(action) => family::run(scope, action).await,
        Action::Call(action) => call::run(scope, action).await,
        Action::Users(action) => users::run(scope, action).await,
    }
}

/// What one running effect may do: call the backend, read state, land its
/// terminal action (if still current) and start follow-up requests.
pub(crate) struct EffectScope {
    store: Store,
    operation: &'static str,
    ticket: u64,
}

impl EffectScope {
    pub(crate) fn new(store: Store, operation: &'static str, ticket: u64) -> Self {
        Self {
            store,
            operation,
            ticket,
        }
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    /// Stored bearer token of `principal`.
    pub(crate) fn bearer(&self, principal: Principal) -> Result<String> {
        self.store
            .persistence()
            .tokens(principal)
            .get()
            .ok_or_else(|| AveryError::not_authenticated(principal))
    }

    /// Sends `request` and returns the body of a successful answer.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.store.transport().send(request).await?.into_result()
    }

    /// Sends `request` with the stored token of `principal`. Without a
    /// token nothing is sent.
    pub(crate) async fn send_as(&self, principal: Principal, request: ApiRequest) -> Result<Value> {
        let token = self.bearer(principal)?;
        self.send(request.with_bearer(token)).await
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        self.store.read(f)
    }

    /// Lands a success action, with an optional success notification.
    pub(crate) fn succeed(&self, action: impl Into<Action>, message: Option<String>) -> bool {
        let landed = self.store.resolve(self.operation, self.ticket, &action.into());
        if landed {
            if let Some(message) = message {
                self.store.notify(Notification::success(self.operation, message));
            }
        }
        landed
    }

    /// Lands a failure action built from `error` and notifies it.
    pub(crate) fn fail<A, F>(&self, error: &AveryError, fallback: &str, failure: F) -> bool
    where
        A: Into<Action>,
        F: FnOnce(String) -> A,
    {
        let message = error.user_message(fallback);
        tracing::warn!(operation = self.operation, "Effect failed: {}", error);
        let landed = self
            .store
            .resolve(self.operation, self.ticket, &failure(message.clone()).into());
        if landed {
            self.store.notify(Notification::error(self.operation, message));
        }
        landed
    }

    /// Starts a cascaded request.
    pub(crate) fn follow_up(&self, action: impl Into<Action>) {
        let action = action.into();
        tracing::debug!(from = self.operation, to = %action.type_name(), "Cascading request");
        self.store.dispatch(action);
    }
}

/// The backend's `message` field, if present and non-blank.
pub(crate) fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

/// Success text: the backend's message or `fallback`.
pub(crate) fn success_text(body: &Value, fallback: &str) -> String {
    message_of(body).unwrap_or_else(|| fallback.to_string())
}

/// Deserializes `body[field]`, treating a missing field as a decode error.
pub(crate) fn field<T: serde::de::DeserializeOwned>(body: &Value, field: &str) -> Result<T> {
    let value = body
        .get(field)
        .ok_or_else(|| AveryError::decode(format!("response has no `{}` field", field)))?;
    serde_json::from_value(value.clone()).map_err(|e| AveryError::decode(e.to_string()))
}
