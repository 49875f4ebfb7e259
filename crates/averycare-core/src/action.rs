//! Action vocabulary shared by every slice.
//!
//! Each asynchronous capability is a [`Phase`]: the presentation side
//! dispatches `Request`, an effect orchestrator answers with exactly one
//! `Success` or `Failure`.

use serde::{Deserialize, Serialize};

use crate::slice::{AdminAuthAction, AuthAction, CallAction, FamilyAction, UsersAction};

/// Three-phase lifecycle of one asynchronous capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "payload", rename_all = "snake_case")]
pub enum Phase<P, R> {
    Request(P),
    Success(R),
    Failure(String),
}

impl<P, R> Phase<P, R> {
    pub fn stage(&self) -> Stage {
        match self {
            Phase::Request(_) => Stage::Request,
            Phase::Success(_) => Stage::Success,
            Phase::Failure(_) => Stage::Failure,
        }
    }
}

/// Where an action sits in its operation's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Request,
    Success,
    Failure,
    /// Synchronous action without a network counterpart.
    Plain,
}

impl Stage {
    pub fn suffix(self) -> &'static str {
        match self {
            Stage::Request => "Request",
            Stage::Success => "Success",
            Stage::Failure => "Failure",
            Stage::Plain => "",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Success | Stage::Failure)
    }
}

/// Backend acknowledgement of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Acknowledged {
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }
}

/// Backend acknowledgement of a deletion, carrying the removed id so the
/// slice can drop it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removed {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Removed {
    pub fn new(id: impl Into<String>, message: Option<String>) -> Self {
        Self {
            id: id.into(),
            message,
        }
    }
}

/// Every action the store understands, grouped by owning slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "slice", content = "action", rename_all = "camelCase")]
pub enum Action {
    Auth(AuthAction),
    AdminAuth(AdminAuthAction),
    Family(FamilyAction),
    Call(CallAction),
    Users(UsersAction),
}

impl Action {
    /// Operation key, e.g. `call/fetchScheduledCalls`. Requests sharing a key
    /// supersede each other.
    pub fn operation(&self) -> &'static str {
        match self {
            Action::Auth(a) => a.operation(),
            Action::AdminAuth(a) => a.operation(),
            Action::Family(a) => a.operation(),
            Action::Call(a) => a.operation(),
            Action::Users(a) => a.operation(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Action::Auth(a) => a.stage(),
            Action::AdminAuth(a) => a.stage(),
            Action::Family(a) => a.stage(),
            Action::Call(a) => a.stage(),
            Action::Users(a) => a.stage(),
        }
    }

    /// Full action type, e.g. `call/fetchScheduledCallsRequest`.
    pub fn type_name(&self) -> String {
        format!("{}{}", self.operation(), self.stage().suffix())
    }

    pub fn is_request(&self) -> bool {
        self.stage() == Stage::Request
    }
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<AdminAuthAction> for Action {
    fn from(action: AdminAuthAction) -> Self {
        Action::AdminAuth(action)
    }
}

impl From<FamilyAction> for Action {
    fn from(action: FamilyAction) -> Self {
        Action::Family(action)
    }
}

impl From<CallAction> for Action {
    fn from(action: CallAction) -> Self {
        Action::Call(action)
    }
}

impl From<UsersAction> for Action {
    fn from(action: UsersAction) -> Self {
        Action::Users(action)
    }
}
