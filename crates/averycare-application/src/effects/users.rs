//! Admin console orchestrators. Every call here authenticates with the
//! admin token.

use averycare_core::action::{Phase, Removed};
use averycare_core::api::ApiRequest;
use averycare_core::model::user::DEFAULT_ADMIN_LIMIT;
use averycare_core::model::{
    AdminCallQuery, AdminUser, FamilyMember, MemberQuery, PageCursor, Paged, ScheduledCall,
    UserDetail, UserQuery,
};
use averycare_core::session::Principal;
use averycare_core::slice::{MemberDetail, UsersAction};
use averycare_core::{AveryError, Result};
use serde_json::Value;

use super::{EffectScope, field, success_text};

pub(super) async fn run(scope: &EffectScope, action: UsersAction) {
    match action {
        UsersAction::FetchUsers(Phase::Request(query)) => fetch_users(scope, query).await,
        UsersAction::FetchUserDetail(Phase::Request(id)) => fetch_user_detail(scope, id).await,
        UsersAction::DeleteUser(Phase::Request(id)) => delete_user(scope, id).await,
        UsersAction::FetchFamilyMembers(Phase::Request(query)) => {
            fetch_family_members(scope, query).await
        }
        UsersAction::FetchSingleFamilyMember(Phase::Request(id)) => {
            fetch_single_family_member(scope, id).await
        }
        UsersAction::DeleteFamilyMember(Phase::Request(id)) => {
            delete_family_member(scope, id).await
        }
        UsersAction::FetchScheduledCalls(Phase::Request(query)) => {
            fetch_scheduled_calls(scope, query).await
        }
        UsersAction::DeleteScheduledCall(Phase::Request(id)) => {
            delete_scheduled_call(scope, id).await
        }
        _ => {}
    }
}

fn request_cursor(page: Option<u32>, limit: Option<u32>) -> PageCursor {
    PageCursor::new(
        page.filter(|p| *p > 0).unwrap_or(1),
        limit.filter(|l| *l > 0).unwrap_or(DEFAULT_ADMIN_LIMIT),
    )
}

/// `{users, totalPages, totalUsers}` as a page at the requested cursor.
fn users_page(body: &Value, query: &UserQuery) -> Result<Paged<AdminUser>> {
    let users: Vec<AdminUser> = field(body, "users")?;
    let cursor = request_cursor(Some(query.page), Some(query.limit));
    let total = body
        .get("totalUsers")
        .and_then(Value::as_u64)
        .unwrap_or(users.len() as u64);
    Ok(Paged::new(users, total, cursor.page, cursor.limit))
}

/// Detail endpoint answers `{data: {user: {...}}}`.
fn user_detail(body: &Value) -> Result<UserDetail> {
    let data = body
        .get("data")
        .ok_or_else(|| AveryError::decode("response has no `data` field"))?;
    field(data, "user")
}

async fn fetch_users(scope: &EffectScope, query: UserQuery) {
    let result: Result<Paged<AdminUser>> = async {
        let request = ApiRequest::get("admin/users").with_query(query.to_query());
        let body = scope.send_as(Principal::Admin, request).await?;
        users_page(&body, &query)
    }
    .await;

    match result {
        Ok(paged) => {
            scope.succeed(UsersAction::FetchUsers(Phase::Success(paged)), None);
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch users", |m| {
                UsersAction::FetchUsers(Phase::Failure(m))
            });
        }
    }
}

async fn fetch_user_detail(scope: &EffectScope, id: String) {
    let result: Result<UserDetail> = async {
        let request = ApiRequest::get(format!("admin/user/{}", id));
        let body = scope.send_as(Principal::Admin, request).await?;
        user_detail(&body)
    }
    .await;

    match result {
        Ok(detail) => {
            scope.succeed(UsersAction::FetchUserDetail(Phase::Success(detail)), None);
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch user details", |m| {
                UsersAction::FetchUserDetail(Phase::Failure(m))
            });
        }
    }
}

async fn delete_user(scope: &EffectScope, id: String) {
    let result: Result<Value> = async {
        scope
            .send_as(Principal::Admin, ApiRequest::delete(format!("admin/user/{}", id)))
            .await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "User deleted successfully");
            let landed = scope.succeed(
                UsersAction::DeleteUser(Phase::Success(Removed::new(id, Some(text.clone())))),
                Some(text),
            );
            if landed {
                let query = scope.read(|s| s.users.users_refetch_query());
                scope.follow_up(UsersAction::FetchUsers(Phase::Request(query)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to delete user", |m| {
                UsersAction::DeleteUser(Phase::Failure(m))
            });
        }
    }
}

async fn fetch_family_members(scope: &EffectScope, query: MemberQuery) {
    let result: Result<Paged<FamilyMember>> = async {
        let request = ApiRequest::get("admin/familyMembers").with_query(query.to_query());
        let body = scope.send_as(Principal::Admin, request).await?;
        let paged: Paged<FamilyMember> = serde_json::from_value(body)?;
        Ok(paged.or_cursor(request_cursor(query.page, query.limit)))
    }
    .await;

    match result {
        Ok(paged) => {
            scope.succeed(UsersAction::FetchFamilyMembers(Phase::Success(paged)), None);
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch family members", |m| {
                UsersAction::FetchFamilyMembers(Phase::Failure(m))
            });
        }
    }
}

async fn fetch_single_family_member(scope: &EffectScope, id: String) {
    let result: Result<MemberDetail> = async {
        let request = ApiRequest::get(format!("admin/familyMember/{}", id));
        let body = scope.send_as(Principal::Admin, request).await?;
        field(&body, "data")
    }
    .await;

    match result {
        Ok(detail) => {
            scope.succeed(
                UsersAction::FetchSingleFamilyMember(Phase::Success(detail)),
                None,
            );
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch family member", |m| {
                UsersAction::FetchSingleFamilyMember(Phase::Failure(m))
            });
        }
    }
}

async fn delete_family_member(scope: &EffectScope, id: String) {
    let result: Result<Value> = async {
        let request = ApiRequest::delete(format!("admin/familyMember/{}", id));
        scope.send_as(Principal::Admin, request).await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Family member deleted successfully");
            let landed = scope.succeed(
                UsersAction::DeleteFamilyMember(Phase::Success(Removed::new(id, Some(text.clone())))),
                Some(text),
            );
            if landed {
                let open = scope.read(|s| s.users.user_detail.as_ref().map(|d| d.user.id.clone()));
                if let Some(user_id) = open {
                    scope.follow_up(UsersAction::FetchUserDetail(Phase::Request(user_id)));
                }
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to delete family member", |m| {
                UsersAction::DeleteFamilyMember(Phase::Failure(m))
            });
        }
    }
}

async fn fetch_scheduled_calls(scope: &EffectScope, query: AdminCallQuery) {
    let result: Result<Paged<ScheduledCall>> = async {
        let request = ApiRequest::get("admin/scheduledCalls").with_query(query.to_query());
        let body = scope.send_as(Principal::Admin, request).await?;
        let paged: Paged<ScheduledCall> = serde_json::from_value(body)?;
        Ok(paged.or_cursor(request_cursor(query.page, query.limit)))
    }
    .await;

    match result {
        Ok(paged) => {
            scope.succeed(UsersAction::FetchScheduledCalls(Phase::Success(paged)), None);
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch scheduled calls", |m| {
                UsersAction::FetchScheduledCalls(Phase::Failure(m))
            });
        }
    }
}

async fn delete_scheduled_call(scope: &EffectScope, id: String) {
    let result: Result<Value> = async {
        let request = ApiRequest::delete(format!("admin/deleteScheduledCall/{}", id));
        scope.send_as(Principal::Admin, request).await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Scheduled call deleted successfully");
            let landed = scope.succeed(
                UsersAction::DeleteScheduledCall(Phase::Success(Removed::new(id, Some(text.clone())))),
                Some(text),
            );
            if landed {
                let query = scope.read(|s| s.users.scheduled_calls_refetch_query());
                scope.follow_up(UsersAction::FetchScheduledCalls(Phase::Request(query)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to delete scheduled call", |m| {
                UsersAction::DeleteScheduledCall(Phase::Failure(m))
            });
        }
    }
}
