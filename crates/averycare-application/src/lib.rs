//! Application layer for AveryCare.
//!
//! Hosts the [`Store`]: it reduces dispatched actions into the shared state
//! tree, runs one effect task per request action and writes the session
//! partitions back to durable storage.

mod effects;
pub mod notification;
pub mod persistence;
pub mod store;

pub use notification::{Notification, NotificationKind};
pub use persistence::SessionPersistence;
pub use store::Store;
