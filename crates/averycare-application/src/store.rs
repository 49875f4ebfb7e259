//! The root aggregator.
//!
//! A [`Store`] owns the [`RootState`] tree, reduces every dispatched action
//! into it and publishes the result through a watch channel. Request actions
//! additionally start one effect task each. A newer request for the same
//! operation invalidates the ticket of the older one: the older task still
//! runs its backend call to completion, but its terminal action is dropped,
//! so only the latest request of a kind can land its result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use averycare_core::action::Action;
use averycare_core::api::HttpTransport;
use averycare_core::state::{self, RootState};
use averycare_core::storage::KeyValueStore;
use tokio::sync::{mpsc, watch};

use crate::effects::{self, EffectScope};
use crate::notification::Notification;
use crate::persistence::SessionPersistence;

/// Latest ticket issued per operation.
#[derive(Default)]
struct Tickets {
    next: u64,
    latest: HashMap<&'static str, u64>,
}

impl Tickets {
    fn issue(&mut self, operation: &'static str) -> (u64, Option<u64>) {
        self.next += 1;
        let superseded = self.latest.insert(operation, self.next);
        (self.next, superseded)
    }

    fn is_current(&self, operation: &str, ticket: u64) -> bool {
        self.latest.get(operation) == Some(&ticket)
    }
}

struct Inner {
    state: watch::Sender<RootState>,
    persistence: SessionPersistence,
    transport: Arc<dyn HttpTransport>,
    tickets: Mutex<Tickets>,
    pending: watch::Sender<usize>,
    /// Present only while a subscriber holds the receiving end.
    notifications: Mutex<Option<mpsc::UnboundedSender<Notification>>>,
}

/// Cheap-to-clone handle to the shared client state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Store {
    /// Builds the store. Both session partitions are restored from `storage`
    /// before the state tree is published.
    pub fn new(transport: Arc<dyn HttpTransport>, storage: Arc<dyn KeyValueStore>) -> Self {
        let persistence = SessionPersistence::new(storage);
        let (auth, admin_auth) = persistence.restore();
        let (state, _) = watch::channel(RootState::with_sessions(auth, admin_auth));
        let (pending, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                state,
                persistence,
                transport,
                tickets: Mutex::new(Tickets::default()),
                pending,
                notifications: Mutex::new(None),
            }),
        }
    }

    /// Applies `action` and, for request actions, starts its effect.
    ///
    /// Must be called from within a Tokio runtime when `action` is a request.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        self.apply(&action);
        if action.is_request() {
            self.spawn_effect(action);
        }
    }

    /// Snapshot of the current state tree.
    pub fn state(&self) -> RootState {
        self.inner.state.borrow().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Receiver that observes every new state tree.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.inner.state.subscribe()
    }

    /// Opens the notification stream.
    ///
    /// Outcomes are only queued while the returned receiver is alive; those
    /// produced before it was opened or after it was dropped are discarded.
    /// Returns `None` while another receiver is still open.
    pub fn notifications(&self) -> Option<mpsc::UnboundedReceiver<Notification>> {
        let mut sender = lock(&self.inner.notifications);
        if sender.as_ref().is_some_and(|tx| !tx.is_closed()) {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *sender = Some(tx);
        Some(rx)
    }

    /// Number of effect tasks currently running, superseded ones included.
    pub fn in_flight(&self) -> usize {
        *self.inner.pending.borrow()
    }

    /// Waits until no effect task is running, including cascaded refetches
    /// and superseded requests.
    pub async fn settle(&self) {
        let mut pending = self.inner.pending.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = pending.wait_for(|count| *count == 0).await;
    }

    pub(crate) fn persistence(&self) -> &SessionPersistence {
        &self.inner.persistence
    }

    pub(crate) fn transport(&self) -> &dyn HttpTransport {
        self.inner.transport.as_ref()
    }

    pub(crate) fn notify(&self, notification: Notification) {
        let mut sender = lock(&self.inner.notifications);
        let delivered = sender
            .as_ref()
            .is_some_and(|tx| tx.send(notification).is_ok());
        if !delivered && sender.take().is_some() {
            tracing::debug!("Notification receiver dropped");
        }
    }

    fn apply(&self, action: &Action) {
        tracing::debug!(action = %action.type_name(), "Dispatching");
        self.inner.state.send_modify(|tree| {
            let current = std::mem::take(tree);
            *tree = state::reduce(current, action);
        });
        self.inner.persistence.persist(action);
    }

    /// Applies a terminal action on behalf of the effect holding `ticket`.
    ///
    /// Returns `false`, without touching the state, when a newer request of
    /// the same operation has superseded that effect.
    pub(crate) fn resolve(&self, operation: &'static str, ticket: u64, action: &Action) -> bool {
        let tickets = lock(&self.inner.tickets);
        if !tickets.is_current(operation, ticket) {
            tracing::warn!(operation, ticket, "Discarding stale result");
            return false;
        }
        self.apply(action);
        true
    }

    fn spawn_effect(&self, action: Action) {
        let operation = action.operation();
        let (ticket, superseded) = lock(&self.inner.tickets).issue(operation);
        if let Some(previous) = superseded {
            tracing::debug!(operation, superseded = previous, "Superseded request");
        }

        self.inner.pending.send_modify(|count| *count += 1);
        let scope = EffectScope::new(self.clone(), operation, ticket);
        tokio::spawn(async move {
            effects::run(&scope, action).await;
            scope.store().finish();
        });
    }

    fn finish(&self) {
        self.inner
            .pending
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}
