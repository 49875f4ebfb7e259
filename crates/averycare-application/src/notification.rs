use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A user-visible outcome of one effect, e.g. "Call scheduled successfully".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Operation key the outcome belongs to, e.g. `call/scheduleHealthCall`.
    pub operation: String,
    pub text: String,
}

impl Notification {
    pub fn success(operation: &str, text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            operation: operation.to_string(),
            text: text.into(),
        }
    }

    pub fn error(operation: &str, text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            operation: operation.to_string(),
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
