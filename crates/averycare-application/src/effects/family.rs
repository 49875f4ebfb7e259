use averycare_core::action::{Acknowledged, Phase, Removed};
use averycare_core::api::{ApiRequest, SparseQuery};
use averycare_core::model::{
    FamilyMember, FamilyMemberForm, FamilyMemberPatch, FamilyPage, FamilyPageMeta, PageCursor,
};
use averycare_core::session::Principal;
use averycare_core::slice::{FamilyAction, FamilyMemberUpdate};
use averycare_core::Result;
use serde_json::Value;

use super::{EffectScope, success_text};

pub(super) async fn run(scope: &EffectScope, action: FamilyAction) {
    match action {
        FamilyAction::FetchFamilyMembers(Phase::Request(cursor)) => fetch(scope, cursor).await,
        FamilyAction::AddFamilyMember(Phase::Request(form)) => add(scope, form).await,
        FamilyAction::DeleteFamilyMember(Phase::Request(id)) => delete(scope, id).await,
        FamilyAction::UpdateFamilyMember(Phase::Request(edit)) => update(scope, edit).await,
        _ => {}
    }
}

/// Normalizes `{data, meta}`; a missing `meta` falls back to the cursor the
/// page was requested with.
fn family_page(body: &Value, cursor: PageCursor) -> Result<FamilyPage> {
    let data: Vec<FamilyMember> = match body.get("data") {
        Some(Value::Null) | None => Vec::new(),
        Some(data) => serde_json::from_value(data.clone())?,
    };
    let meta = match body.get("meta") {
        Some(Value::Null) | None => FamilyPageMeta::fallback(cursor.page, cursor.limit),
        Some(meta) => serde_json::from_value(meta.clone())?,
    };
    Ok(FamilyPage { data, meta })
}

/// The updated member as returned by the backend, or the submitted form
/// when the response carries none.
fn update_patch(body: &Value, update: &FamilyMemberUpdate) -> Result<FamilyMemberPatch> {
    if let Some(member) = body.get("familyMember").filter(|m| m.is_object()) {
        return Ok(serde_json::from_value(member.clone())?);
    }
    let form = &update.data;
    Ok(FamilyMemberPatch {
        id: update.id.clone(),
        name: form.name.clone(),
        relationship: form.relationship.clone(),
        email: form.email.clone(),
        phone_number: form.phone_number.clone(),
        ..Default::default()
    })
}

async fn fetch(scope: &EffectScope, cursor: PageCursor) {
    let result: Result<FamilyPage> = async {
        let mut query = SparseQuery::new();
        query.push("page", cursor.page).push("limit", cursor.limit);
        let body = scope
            .send_as(
                Principal::User,
                ApiRequest::get("family/fetchFamilyMembers").with_query(query),
            )
            .await?;
        family_page(&body, cursor)
    }
    .await;

    match result {
        Ok(page) => {
            scope.succeed(FamilyAction::FetchFamilyMembers(Phase::Success(page)), None);
        }
        Err(e) => {
            scope.fail(&e, "Failed to fetch members", |m| {
                FamilyAction::FetchFamilyMembers(Phase::Failure(m))
            });
        }
    }
}

async fn add(scope: &EffectScope, form: FamilyMemberForm) {
    let result: Result<Value> = async {
        let request = ApiRequest::post("family").with_json(&form)?;
        scope.send_as(Principal::User, request).await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Family member added successfully!");
            let landed = scope.succeed(
                FamilyAction::AddFamilyMember(Phase::Success(Acknowledged::new(Some(text.clone())))),
                Some(text),
            );
            if landed {
                let limit = scope.read(|s| s.family.meta.limit);
                scope.follow_up(FamilyAction::FetchFamilyMembers(Phase::Request(
                    PageCursor::first(limit),
                )));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to add family member", |m| {
                FamilyAction::AddFamilyMember(Phase::Failure(m))
            });
        }
    }
}

async fn delete(scope: &EffectScope, id: String) {
    let result: Result<Value> = async {
        scope
            .send_as(Principal::User, ApiRequest::delete(format!("family/{}", id)))
            .await
    }
    .await;

    match result {
        Ok(body) => {
            let text = success_text(&body, "Family member deleted successfully!");
            let landed = scope.succeed(
                FamilyAction::DeleteFamilyMember(Phase::Success(Removed::new(id, Some(text.clone())))),
                Some(text),
            );
            if landed {
                let cursor = scope.read(|s| s.family.cursor());
                scope.follow_up(FamilyAction::FetchFamilyMembers(Phase::Request(cursor)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to delete family member", |m| {
                FamilyAction::DeleteFamilyMember(Phase::Failure(m))
            });
        }
    }
}

async fn update(scope: &EffectScope, update: FamilyMemberUpdate) {
    let result: Result<(FamilyMemberPatch, Value)> = async {
        let request = ApiRequest::put(format!("family/{}", update.id)).with_json(&update.data)?;
        let body = scope.send_as(Principal::User, request).await?;
        Ok((update_patch(&body, &update)?, body))
    }
    .await;

    match result {
        Ok((patch, body)) => {
            let landed = scope.succeed(
                FamilyAction::UpdateFamilyMember(Phase::Success(patch)),
                Some(success_text(&body, "Family member updated successfully!")),
            );
            if landed {
                let cursor = scope.read(|s| s.family.cursor());
                scope.follow_up(FamilyAction::FetchFamilyMembers(Phase::Request(cursor)));
            }
        }
        Err(e) => {
            scope.fail(&e, "Failed to update family member", |m| {
                FamilyAction::UpdateFamilyMember(Phase::Failure(m))
            });
        }
    }
}
