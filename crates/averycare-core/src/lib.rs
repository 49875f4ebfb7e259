pub mod action;
pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod slice;
pub mod state;
pub mod storage;

// Re-export common error type
pub use error::{AveryError, Result};

pub use action::{Action, Phase, Stage};
pub use state::RootState;
