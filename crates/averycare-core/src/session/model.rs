//! Session domain models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AveryError, Result};

/// An authenticated actor type. Each principal has its own session and
/// credential storage so that both can be logged in at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    /// A regular end user of the dashboard.
    User,
    /// An operator of the admin console.
    Admin,
}

impl Principal {
    /// Durable storage key holding the raw bearer token.
    pub fn token_key(self) -> &'static str {
        match self {
            Principal::User => "token",
            Principal::Admin => "adminToken",
        }
    }

    /// Durable storage key holding the JSON-encoded identity.
    pub fn identity_key(self) -> &'static str {
        match self {
            Principal::User => "user",
            Principal::Admin => "adminEmail",
        }
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Principal::User => write!(f, "user"),
            Principal::Admin => write!(f, "admin"),
        }
    }
}

/// The end-user session: identity plus bearer token.
///
/// The same shape is written to durable storage under the `user` key, so the
/// dashboard can render the identity before any network round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, alias = "isVerified")]
    pub verified: bool,
}

impl Session {
    /// Builds a session from a login or verify-otp response body.
    ///
    /// Accepts both the flat shape (`{token, name, role, ...}`) and the nested
    /// one (`{token, user: {...}}`). A top-level token wins over a nested one.
    pub fn from_response(body: &Value) -> Result<Self> {
        let mut session: Session = match body.get("user") {
            Some(user @ Value::Object(_)) => serde_json::from_value(user.clone())?,
            _ => serde_json::from_value(body.clone())?,
        };

        if let Some(token) = body.get("token").and_then(Value::as_str) {
            session.token = Some(token.to_string());
        }

        if session.token.is_none() && session.id.is_none() && session.email.is_none() {
            return Err(AveryError::decode("session response carries no identity"));
        }

        Ok(session)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// The admin console session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    pub token: String,
}
