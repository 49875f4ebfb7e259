//! User-facing scheduled call slice.

use serde::{Deserialize, Serialize};

use crate::action::{Acknowledged, Phase, Removed, Stage};
use crate::model::call::DEFAULT_CALL_LIMIT;
use crate::model::{
    CallQuery, DeleteCallPayload, Page, PageCursor, Paged, RequestState, ReschedulePayload,
    ScheduleCallPayload, ScheduledCall,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CallAction {
    ScheduleHealthCall(Phase<ScheduleCallPayload, Acknowledged>),
    FetchScheduledCalls(Phase<CallQuery, Paged<ScheduledCall>>),
    UpdateScheduledCall(Phase<ReschedulePayload, Acknowledged>),
    DeleteScheduledCall(Phase<DeleteCallPayload, Removed>),
    ClearCallMessages,
}

impl CallAction {
    pub fn operation(&self) -> &'static str {
        match self {
            CallAction::ScheduleHealthCall(_) => "call/scheduleHealthCall",
            CallAction::FetchScheduledCalls(_) => "call/fetchScheduledCalls",
            CallAction::UpdateScheduledCall(_) => "call/updateScheduledCall",
            CallAction::DeleteScheduledCall(_) => "call/deleteScheduledCall",
            CallAction::ClearCallMessages => "call/clearCallMessages",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            CallAction::ScheduleHealthCall(p) => p.stage(),
            CallAction::FetchScheduledCalls(p) => p.stage(),
            CallAction::UpdateScheduledCall(p) => p.stage(),
            CallAction::DeleteScheduledCall(p) => p.stage(),
            CallAction::ClearCallMessages => Stage::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallState {
    pub calls: Page<ScheduledCall>,
    /// Filters of the most recent list request, reused for refetches.
    pub last_query: CallQuery,
    #[serde(flatten)]
    pub request: RequestState,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            calls: Page::empty(DEFAULT_CALL_LIMIT),
            last_query: CallQuery {
                page: Some(1),
                limit: Some(DEFAULT_CALL_LIMIT),
                ..Default::default()
            },
            request: RequestState::default(),
        }
    }
}

impl CallState {
    pub fn cursor(&self) -> PageCursor {
        self.calls.cursor()
    }

    fn query_cursor(&self) -> PageCursor {
        PageCursor::new(
            self.last_query.page.unwrap_or(1),
            self.last_query.limit.unwrap_or(DEFAULT_CALL_LIMIT),
        )
    }
}

pub fn reduce(mut state: CallState, action: &CallAction) -> CallState {
    match action {
        CallAction::ScheduleHealthCall(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(ack) => state.request.succeed_with(ack.message.clone()),
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        CallAction::FetchScheduledCalls(phase) => match phase {
            Phase::Request(query) => {
                state.request.begin();
                state.last_query = query.clone();
            }
            Phase::Success(paged) => {
                state.request.succeed();
                let cursor = state.query_cursor();
                state.calls = paged.clone().or_cursor(cursor).into();
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        CallAction::UpdateScheduledCall(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(ack) => state.request.succeed_with(ack.message.clone()),
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        CallAction::DeleteScheduledCall(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(removed) => {
                state.request.succeed_with(removed.message.clone());
                state.calls.remove_where(|call| call.id == removed.id);
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        CallAction::ClearCallMessages => {
            state.request.clear_error();
            state.request.clear_message();
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CallStatus;
    use serde_json::json;

    fn call(id: &str) -> ScheduledCall {
        serde_json::from_value(json!({"_id": id, "recipientName": "Ravi", "status": "pending"}))
            .unwrap()
    }

    #[test]
    fn test_fetch_success_derives_total_pages() {
        let query = CallQuery {
            page: Some(1),
            limit: Some(10),
            ..Default::default()
        };
        let state = reduce(
            CallState::default(),
            &CallAction::FetchScheduledCalls(Phase::Request(query)),
        );
        let paged = Paged::new(vec![call("c1"), call("c2"), call("c3")], 23, 1, 10);
        let state = reduce(state, &CallAction::FetchScheduledCalls(Phase::Success(paged)));

        assert_eq!(state.calls.total_pages(), 3);
        assert_eq!(state.calls.page(), 1);
        assert_eq!(state.calls.len(), 3);
        assert!(!state.request.loading);
    }

    #[test]
    fn test_request_remembers_scope() {
        let query = CallQuery::pending(PageCursor::new(2, 5));
        let state = reduce(
            CallState::default(),
            &CallAction::FetchScheduledCalls(Phase::Request(query)),
        );
        assert_eq!(state.last_query.status, Some(CallStatus::Pending));
        assert_eq!(state.last_query.page, Some(2));
    }

    #[test]
    fn test_delete_decrements_total() {
        let paged = Paged::new(vec![call("c1"), call("c2")], 2, 1, 5);
        let state = reduce(
            CallState::default(),
            &CallAction::FetchScheduledCalls(Phase::Success(paged)),
        );
        let state = reduce(
            state,
            &CallAction::DeleteScheduledCall(Phase::Success(Removed::new(
                "c1",
                Some("Call deleted".into()),
            ))),
        );

        assert_eq!(state.calls.len(), 1);
        assert_eq!(state.calls.total(), 1);
        assert_eq!(state.request.message.as_deref(), Some("Call deleted"));

        let state = reduce(state, &CallAction::ClearCallMessages);
        assert!(state.request.message.is_none());
    }

    #[test]
    fn test_repeated_failure_is_idempotent() {
        let failure = CallAction::ScheduleHealthCall(Phase::Failure("boom".into()));
        let once = reduce(CallState::default(), &failure);
        let twice = reduce(once.clone(), &failure);
        assert_eq!(once, twice);
    }
}
