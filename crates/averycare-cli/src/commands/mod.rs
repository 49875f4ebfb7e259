pub mod admin;
pub mod auth;
pub mod calls;
pub mod family;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use averycare_application::{Notification, NotificationKind, Store};
use averycare_core::action::Action;
use averycare_infrastructure::{ConfigService, FileKeyValueStore};
use averycare_interaction::ReqwestTransport;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

/// One CLI invocation: a store wired to the real backend and the session
/// file, plus the notifications it produces.
pub struct Context {
    store: Store,
    notifications: UnboundedReceiver<Notification>,
}

impl Context {
    pub fn build(api_url: Option<String>) -> Result<Self> {
        let config_service = ConfigService::new()?;
        let mut config = config_service
            .get_config()
            .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
        config.override_api_base_url(api_url);

        let storage = match &config.storage_file {
            Some(path) => FileKeyValueStore::with_path(path.clone()),
            None => FileKeyValueStore::new()?,
        };
        let transport = ReqwestTransport::from_config(&config);
        tracing::debug!(
            api = %transport.base_url(),
            storage = %storage.path().display(),
            "Client configured"
        );

        let store = Store::new(Arc::new(transport), Arc::new(storage));
        let notifications = store
            .notifications()
            .context("Notification stream already taken")?;
        Ok(Self {
            store,
            notifications,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Dispatches `action` and waits for it and every cascaded request.
    pub async fn dispatch(&mut self, action: impl Into<Action>) {
        self.store.dispatch(action);
        self.store.settle().await;
    }

    /// Prints `value` as pretty JSON, then reports the notifications of this
    /// run. Fails if any of them was an error.
    pub fn finish<T: Serialize>(&mut self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);

        let mut failure = None;
        while let Ok(notification) = self.notifications.try_recv() {
            match notification.kind {
                NotificationKind::Success => eprintln!("✓ {}", notification.text),
                NotificationKind::Error => {
                    eprintln!("✗ {}", notification.text);
                    failure.get_or_insert(notification.text);
                }
            }
        }

        match failure {
            Some(text) => anyhow::bail!(text),
            None => Ok(()),
        }
    }
}
