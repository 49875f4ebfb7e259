//! Principals, their sessions and the per-principal token store.

pub mod model;
pub mod token_store;

pub use model::{AdminSession, Principal, Session};
pub use token_store::TokenStore;
