use averycare_core::action::{Acknowledged, Phase, Removed};
use averycare_core::api::ApiRequest;
use averycare_core::model::{
    CallQuery, DeleteCallPayload, Paged, ReschedulePayload, ScheduleCallPayload, ScheduledCall,
};
use averycare_core::session::Principal;
use averycare_core::slice::CallAction;
use averycare_core::state::RootState;
use averycare_core::Result;
use serde_json::{Value, json};

use super::{EffectScope, success_text};

pub(super) async fn run(scope: &EffectScope, action: CallAction) {
    match action {
        CallAction::ScheduleHealthCall(Phase::Request(payload)) => schedule(scope, payload).await,
        CallAction::FetchScheduledCalls(Phase::Request(query)) => fetch(scope, query).await,
        CallAction::UpdateScheduledCall(Phase::Request(payload)) => reschedule(scope, payload).await,
        CallAction::DeleteScheduledCall(Phase::Request(payload)) => delete(scope, payload).await,
        _ => {}
    }
}

/// List to reload after a schedule or reschedule: the selected family
/// member's calls, or all pending calls, at the current cursor.
fn refetch_query(state: &RootState) -> CallQuery {
    let cursor = state.call.cursor();
    match state.family.selected_id.as_deref() {
        Some(id) => CallQuery::for_recipient(cursor, id),
        None => CallQuery::pending(cursor),
    }
}

async fn schedule(scope: &EffectScope, payload: ScheduleCallPayload) {
    let result: Result<Value> = async {
        let request = ApiRequest::post("calls/scheduleCall").with_json(&payload)?;
        scope.send_as(Principal::User, request).await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Call scheduled successfully");
            let landed = scope.succeed(
                CallAction::ScheduleHealthCall(Phase::Success(Acknowledged::new(Some(text.clone())))),
                Some(text),
            );
            if landed {
                let query = scope.read(refetch_query);
                scope.follow_up(CallAction::FetchScheduledCalls(Phase::Request(query)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to schedule call.", |m| {
                CallAction::ScheduleHealthCall(Phase::Failure(m))
            });
        }
    }
}

async fn fetch(scope: &EffectScope, query: CallQuery) {
    let result: Result<Paged<ScheduledCall>> = async {
        let request = ApiRequest::get("calls/getScheduledCalls").with_query(query.to_query());
        let body = scope.send_as(Principal::User, request).await?;
        Ok(serde_json::from_value(body)?)
    }
    .await;

    match result {
        Ok(paged) => {
            scope.succeed(CallAction::FetchScheduledCalls(Phase::Success(paged)), None);
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch scheduled calls", |m| {
                CallAction::FetchScheduledCalls(Phase::Failure(m))
            });
        }
    }
}

async fn reschedule(scope: &EffectScope, payload: ReschedulePayload) {
    let result: Result<Value> = async {
        let request = ApiRequest::put(format!("calls/update-call/{}", payload.id))
            .with_body(json!({ "scheduledAt": payload.scheduled_at }));
        scope.send_as(Principal::User, request).await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Call updated successfully");
            let landed = scope.succeed(
                CallAction::UpdateScheduledCall(Phase::Success(Acknowledged::new(Some(text.clone())))),
                Some(text),
            );
            if landed {
                let query = scope.read(refetch_query);
                scope.follow_up(CallAction::FetchScheduledCalls(Phase::Request(query)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to update call", |m| {
                CallAction::UpdateScheduledCall(Phase::Failure(m))
            });
        }
    }
}

async fn delete(scope: &EffectScope, payload: DeleteCallPayload) {
    let result: Result<Value> = async {
        let request = ApiRequest::delete(format!("calls/delete-call/{}", payload.call_id));
        scope.send_as(Principal::User, request).await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Call deleted successfully");
            let removed = Removed::new(payload.call_id, Some(text.clone()));
            let landed = scope.succeed(CallAction::DeleteScheduledCall(Phase::Success(removed)), Some(text));
            if landed {
                let cursor = scope.read(|s| s.call.cursor());
                let query = match payload.scheduled_to_id {
                    Some(id) => CallQuery::for_recipient(cursor, id),
                    None => CallQuery::pending(cursor),
                };
                scope.follow_up(CallAction::FetchScheduledCalls(Phase::Request(query)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to delete call", |m| {
                CallAction::DeleteScheduledCall(Phase::Failure(m))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use averycare_core::model::{CallStatus, PageCursor};
    use averycare_core::slice::FamilyAction;

    #[test]
    fn test_refetch_follows_selection() {
        let state = RootState::default();
        let query = refetch_query(&state);
        assert_eq!(query.status, Some(CallStatus::Pending));
        assert_eq!(query.page, Some(1));
        assert_eq!(query.limit, Some(5));

        let state = averycare_core::state::reduce(
            state,
            &FamilyAction::SetSelectedFamilyMember(Some("m7".into())).into(),
        );
        let query = refetch_query(&state);
        assert_eq!(query, CallQuery::for_recipient(PageCursor::first(5), "m7"));
    }
}
