mod support;

use std::time::Duration;

use averycare_core::action::Phase;
use averycare_core::api::HttpMethod;
use averycare_core::model::{CallQuery, DeleteCallPayload, ReschedulePayload, ScheduleCallPayload};
use averycare_core::slice::{CallAction, FamilyAction};
use chrono::{TimeZone, Utc};
use serde_json::json;

use support::*;

const LIST: &str = "calls/getScheduledCalls";

fn query(page: u32, limit: u32) -> CallQuery {
    CallQuery {
        page: Some(page),
        limit: Some(limit),
        ..Default::default()
    }
}

fn schedule_payload() -> ScheduleCallPayload {
    ScheduleCallPayload {
        scheduled_to: "m1".into(),
        scheduled_at: Utc.with_ymd_and_hms(2026, 11, 2, 9, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_schedule_without_token_makes_no_call() {
    let transport = MockTransport::new();
    let store = store_with(&transport, &empty_storage());
    let mut notifications = store.notifications().unwrap();

    store.dispatch(CallAction::ScheduleHealthCall(Phase::Request(schedule_payload())));
    store.settle().await;

    assert_eq!(transport.count(), 0);
    let call = store.state().call;
    assert!(!call.request.loading);
    assert_eq!(
        call.request.error.as_deref(),
        Some("No authentication token found. Please log in.")
    );

    let seen = drain(&mut notifications);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_error());
    assert_eq!(seen[0].operation, "call/scheduleHealthCall");
}

#[tokio::test]
async fn test_fetch_derives_total_pages() {
    let transport = MockTransport::new();
    transport.on(HttpMethod::Get, LIST, 200, calls_page(&["c1", "c2", "c3"], 23, 1, 10));
    let store = store_with(&transport, &user_storage());

    store.dispatch(CallAction::FetchScheduledCalls(Phase::Request(query(1, 10))));
    store.settle().await;

    let calls = store.state().call.calls;
    assert_eq!(calls.total_pages(), 3);
    assert_eq!(calls.page(), 1);
    assert_eq!(calls.len(), 3);
}

#[tokio::test]
async fn test_latest_fetch_wins() {
    let transport = MockTransport::new();
    transport
        .on_delayed(
            HttpMethod::Get,
            LIST,
            Duration::from_millis(200),
            200,
            calls_page(&["stale"], 1, 1, 10),
        )
        .on(HttpMethod::Get, LIST, 200, calls_page(&["c1", "c2"], 2, 2, 10));
    let store = store_with(&transport, &user_storage());

    store.dispatch(CallAction::FetchScheduledCalls(Phase::Request(query(1, 10))));
    while transport.count() == 0 {
        tokio::task::yield_now().await;
    }
    store.dispatch(CallAction::FetchScheduledCalls(Phase::Request(query(2, 10))));
    assert_eq!(store.in_flight(), 2);
    store.settle().await;

    // Both requests reached the backend; only the newer one landed.
    assert_eq!(transport.requests_to(HttpMethod::Get, LIST).len(), 2);

    let call = store.state().call;
    let ids: Vec<_> = call.calls.items().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c1", "c2"]);
    assert_eq!(call.last_query.page, Some(2));
    assert!(!call.request.loading);
}

#[tokio::test]
async fn test_schedule_refetches_selected_member() {
    let transport = MockTransport::new();
    transport
        .on(
            HttpMethod::Post,
            "calls/scheduleCall",
            201,
            json!({"success": true, "message": "Call scheduled"}),
        )
        .on(HttpMethod::Get, LIST, 200, calls_page(&["c1"], 1, 1, 5));
    let store = store_with(&transport, &user_storage());
    let mut notifications = store.notifications().unwrap();

    store.dispatch(FamilyAction::SetSelectedFamilyMember(Some("m1".into())));
    store.dispatch(CallAction::ScheduleHealthCall(Phase::Request(schedule_payload())));
    store.settle().await;

    let post = &transport.requests_to(HttpMethod::Post, "calls/scheduleCall")[0];
    let body = post.body.as_ref().unwrap();
    assert_eq!(body["scheduledTo"], "m1");
    assert!(body["scheduledAt"].as_str().unwrap().starts_with("2026-11-02T09:30:00"));

    let refetch = &transport.requests_to(HttpMethod::Get, LIST)[0];
    assert_eq!(refetch.query.get("scheduledToId"), Some("m1"));
    assert_eq!(refetch.query.get("page"), Some("1"));
    assert!(refetch.query.get("status").is_none());

    assert_eq!(drain(&mut notifications)[0].text, "Call scheduled");
    assert_eq!(store.state().call.calls.len(), 1);
}

#[tokio::test]
async fn test_reschedule_refetches_pending() {
    let transport = MockTransport::new();
    transport
        .on(HttpMethod::Put, "calls/update-call/c1", 200, json!({"success": true}))
        .on(HttpMethod::Get, LIST, 200, calls_page(&["c1"], 1, 1, 5));
    let store = store_with(&transport, &user_storage());

    store.dispatch(CallAction::UpdateScheduledCall(Phase::Request(ReschedulePayload {
        id: "c1".into(),
        scheduled_at: Utc.with_ymd_and_hms(2026, 12, 1, 8, 0, 0).unwrap(),
    })));
    store.settle().await;

    let put = &transport.requests_to(HttpMethod::Put, "calls/update-call/c1")[0];
    let body = put.body.as_ref().unwrap().as_object().unwrap();
    assert_eq!(body.len(), 1);
    assert!(body.contains_key("scheduledAt"));

    let refetch = &transport.requests_to(HttpMethod::Get, LIST)[0];
    assert_eq!(refetch.query.get("status"), Some("pending"));
}

#[tokio::test]
async fn test_delete_scopes_refetch_to_recipient() {
    let transport = MockTransport::new();
    transport
        .on(HttpMethod::Get, LIST, 200, calls_page(&["c1", "c2"], 2, 1, 5))
        .on(HttpMethod::Get, LIST, 200, calls_page(&["c2"], 1, 1, 5))
        .on(HttpMethod::Delete, "calls/delete-call/c1", 200, json!({"success": true}));
    let store = store_with(&transport, &user_storage());

    store.dispatch(CallAction::FetchScheduledCalls(Phase::Request(query(1, 5))));
    store.settle().await;

    store.dispatch(CallAction::DeleteScheduledCall(Phase::Request(DeleteCallPayload {
        call_id: "c1".into(),
        scheduled_to_id: Some("m4".into()),
    })));
    store.settle().await;

    let lists = transport.requests_to(HttpMethod::Get, LIST);
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[1].query.get("scheduledToId"), Some("m4"));

    let calls = store.state().call.calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls.items()[0].id, "c2");
}

#[tokio::test]
async fn test_server_message_is_surfaced() {
    let transport = MockTransport::new();
    transport.on(
        HttpMethod::Post,
        "calls/scheduleCall",
        400,
        json!({"success": false, "message": "Scheduled time must be in the future"}),
    );
    let store = store_with(&transport, &user_storage());

    store.dispatch(CallAction::ScheduleHealthCall(Phase::Request(schedule_payload())));
    store.settle().await;

    assert_eq!(
        store.state().call.request.error.as_deref(),
        Some("Scheduled time must be in the future")
    );
    assert!(transport.requests_to(HttpMethod::Get, LIST).is_empty());
}
