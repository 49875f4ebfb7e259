//! Error types for the AveryCare client core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::Principal;

/// Failure message used when a user-principal call is attempted without a token.
pub const USER_NOT_AUTHENTICATED: &str = "No authentication token found. Please log in.";

/// Failure message used when an admin-principal call is attempted without a token.
pub const ADMIN_NOT_AUTHENTICATED: &str = "No authorization token found";

/// A shared error type for the whole client core.
///
/// Every effect failure is eventually flattened into a human-readable
/// message (see [`AveryError::user_message`]) and stored in the owning
/// slice's `error` field.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AveryError {
    /// No bearer token stored for the principal; no network call was made.
    #[error("{}", not_authenticated_message(*principal))]
    NotAuthenticated { principal: Principal },

    /// The request never reached the backend or never returned.
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with an error status or `success: false`.
    #[error("Server error ({status:?}): {message:?}")]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Durable storage error (key-value store, files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn not_authenticated_message(principal: Principal) -> &'static str {
    match principal {
        Principal::User => USER_NOT_AUTHENTICATED,
        Principal::Admin => ADMIN_NOT_AUTHENTICATED,
    }
}

impl AveryError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn not_authenticated(principal: Principal) -> Self {
        Self::NotAuthenticated { principal }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn server(status: Option<u16>, message: Option<String>) -> Self {
        Self::Server { status, message }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }

    /// Flattens the error into the text shown to the user.
    ///
    /// Preference order: the server's own `message` field, then the
    /// transport error text, then `fallback`. A missing-token error always
    /// yields its fixed message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::NotAuthenticated { principal } => {
                not_authenticated_message(*principal).to_string()
            }
            Self::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Self::Transport(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AveryError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for AveryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AveryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AveryError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AveryError>`.
pub type Result<T> = std::result::Result<T, AveryError>;
