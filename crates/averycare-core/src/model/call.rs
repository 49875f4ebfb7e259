//! Scheduled health call models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::SparseQuery;
use crate::model::{EntityRef, PageCursor};

pub const DEFAULT_CALL_LIMIT: u32 = 5;

/// Lifecycle status of a call. Transitions happen on the backend only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    /// A status this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl CallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CallStatus::Pending => "pending",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(CallStatus::Pending),
            "completed" => Ok(CallStatus::Completed),
            "failed" => Ok(CallStatus::Failed),
            other => Err(format!("unknown call status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub message: String,
}

/// A health call scheduled for a user or one of their family members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCall {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_by: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_to: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_in_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tries_left: Option<u32>,
}

/// Body of the schedule endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCallPayload {
    /// Id of the user or family member who receives the call.
    pub scheduled_to: String,
    pub scheduled_at: DateTime<Utc>,
}

/// Moves an existing call to a new time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReschedulePayload {
    pub id: String,
    pub scheduled_at: DateTime<Utc>,
}

/// Removes a call. `scheduled_to_id` scopes the follow-up refetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCallPayload {
    pub call_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_to_id: Option<String>,
}

/// Filters of the user-facing call list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CallStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
}

impl CallQuery {
    /// Pending calls at the given cursor.
    pub fn pending(cursor: PageCursor) -> Self {
        Self {
            page: Some(cursor.page),
            limit: Some(cursor.limit),
            status: Some(CallStatus::Pending),
            ..Default::default()
        }
    }

    /// Calls of one recipient at the given cursor.
    pub fn for_recipient(cursor: PageCursor, scheduled_to_id: impl Into<String>) -> Self {
        Self {
            page: Some(cursor.page),
            limit: Some(cursor.limit),
            scheduled_to_id: Some(scheduled_to_id.into()),
            ..Default::default()
        }
    }

    pub fn to_query(&self) -> SparseQuery {
        let mut query = SparseQuery::new();
        query
            .push_positive("page", self.page)
            .push_positive("limit", self.limit)
            .push_opt("status", self.status)
            .push_opt("recipientName", self.recipient_name.as_deref())
            .push_opt("dateKeyword", self.date_keyword.as_deref())
            .push_opt("scheduledToId", self.scheduled_to_id.as_deref())
            .push_opt("scheduledAt", self.scheduled_at.as_deref());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_call() {
        let call: ScheduledCall = serde_json::from_value(json!({
            "_id": "c1",
            "recipientName": "Ravi",
            "recipientNumber": "+911",
            "scheduledAt": "2025-01-01T10:00:00.000Z",
            "status": "completed",
            "scheduledBy": {"_id": "u1", "name": "Asha"},
            "scheduledTo": "m1",
            "durationInSeconds": 95,
            "aiSummary": "All good",
            "transcript": [{"role": "assistant", "message": "Hello"}],
            "triesLeft": 2
        }))
        .unwrap();

        assert_eq!(call.status, CallStatus::Completed);
        assert_eq!(call.scheduled_by.as_ref().and_then(|r| r.name()), Some("Asha"));
        assert_eq!(call.scheduled_to.as_ref().map(|r| r.id()), Some("m1"));
        assert_eq!(call.transcript.len(), 1);
    }

    #[test]
    fn test_unknown_status() {
        let call: ScheduledCall =
            serde_json::from_value(json!({"_id": "c1", "status": "in-progress"})).unwrap();
        assert_eq!(call.status, CallStatus::Unknown);
    }

    #[test]
    fn test_query_is_sparse() {
        let query = CallQuery {
            page: Some(2),
            limit: Some(5),
            recipient_name: Some(String::new()),
            scheduled_to_id: Some("m1".into()),
            ..Default::default()
        }
        .to_query();

        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("scheduledToId"), Some("m1"));
        assert_eq!(query.get("recipientName"), None);
        assert_eq!(query.get("status"), None);
    }
}
