//! Admin console slice: registered users, their family members and the
//! global call history.

use serde::{Deserialize, Serialize};

use crate::action::{Phase, Removed, Stage};
use crate::model::user::DEFAULT_ADMIN_LIMIT;
use crate::model::{
    AdminCallQuery, AdminUser, FamilyMember, MemberQuery, Page, PageCursor, Paged, RequestState,
    ScheduledCall, UserDetail, UserQuery,
};

/// One family member with the account it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    pub family_member: FamilyMember,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AdminUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum UsersAction {
    ResetState,
    FetchUsers(Phase<UserQuery, Paged<AdminUser>>),
    FetchUserDetail(Phase<String, UserDetail>),
    DeleteUser(Phase<String, Removed>),
    FetchFamilyMembers(Phase<MemberQuery, Paged<FamilyMember>>),
    FetchSingleFamilyMember(Phase<String, MemberDetail>),
    DeleteFamilyMember(Phase<String, Removed>),
    FetchScheduledCalls(Phase<AdminCallQuery, Paged<ScheduledCall>>),
    UpdateScheduledCallsSearchQuery(AdminCallQuery),
    DeleteScheduledCall(Phase<String, Removed>),
}

impl UsersAction {
    pub fn operation(&self) -> &'static str {
        match self {
            UsersAction::ResetState => "users/resetState",
            UsersAction::FetchUsers(_) => "users/fetchUsers",
            UsersAction::FetchUserDetail(_) => "users/fetchUserDetail",
            UsersAction::DeleteUser(_) => "users/deleteUser",
            UsersAction::FetchFamilyMembers(_) => "users/fetchFamilyMembers",
            UsersAction::FetchSingleFamilyMember(_) => "users/fetchSingleFamilyMember",
            UsersAction::DeleteFamilyMember(_) => "users/deleteFamilyMember",
            UsersAction::FetchScheduledCalls(_) => "users/fetchScheduledCalls",
            UsersAction::UpdateScheduledCallsSearchQuery(_) => {
                "users/updateScheduledCallsSearchQuery"
            }
            UsersAction::DeleteScheduledCall(_) => "users/deleteScheduledCall",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            UsersAction::FetchUsers(p) => p.stage(),
            UsersAction::FetchUserDetail(p) => p.stage(),
            UsersAction::DeleteUser(p) => p.stage(),
            UsersAction::FetchFamilyMembers(p) => p.stage(),
            UsersAction::FetchSingleFamilyMember(p) => p.stage(),
            UsersAction::DeleteFamilyMember(p) => p.stage(),
            UsersAction::FetchScheduledCalls(p) => p.stage(),
            UsersAction::DeleteScheduledCall(p) => p.stage(),
            UsersAction::ResetState | UsersAction::UpdateScheduledCallsSearchQuery(_) => {
                Stage::Plain
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersState {
    pub users: Page<AdminUser>,
    pub user_query: UserQuery,
    pub user_detail: Option<UserDetail>,
    pub family_members: Page<FamilyMember>,
    pub member_query: MemberQuery,
    pub single_family_member: Option<MemberDetail>,
    pub scheduled_calls: Page<ScheduledCall>,
    pub scheduled_calls_search_query: AdminCallQuery,
    #[serde(flatten)]
    pub request: RequestState,
}

impl Default for UsersState {
    fn default() -> Self {
        Self {
            users: Page::empty(DEFAULT_ADMIN_LIMIT),
            user_query: UserQuery::default(),
            user_detail: None,
            family_members: Page::empty(DEFAULT_ADMIN_LIMIT),
            member_query: MemberQuery::default(),
            single_family_member: None,
            scheduled_calls: Page::empty(DEFAULT_ADMIN_LIMIT),
            scheduled_calls_search_query: AdminCallQuery::default(),
            request: RequestState::default(),
        }
    }
}

impl UsersState {
    /// Query that reloads the call history as currently searched and paged.
    pub fn scheduled_calls_refetch_query(&self) -> AdminCallQuery {
        let cursor = self.scheduled_calls.cursor();
        let mut query = self.scheduled_calls_search_query.clone();
        query.page = Some(cursor.page);
        query.limit = Some(cursor.limit);
        query
    }

    /// Query that reloads the user list with the last filters and cursor.
    pub fn users_refetch_query(&self) -> UserQuery {
        let mut query = self.user_query.clone();
        let cursor = self.users.cursor();
        query.page = cursor.page;
        query.limit = cursor.limit;
        query
    }

    fn remove_family_member(&mut self, id: &str) {
        self.family_members.remove_where(|member| member.id == id);
        if let Some(detail) = self.user_detail.as_mut() {
            detail.family_members.retain(|link| {
                link.id != id && link.member.as_ref().is_none_or(|member| member.id != id)
            });
        }
        if self
            .single_family_member
            .as_ref()
            .is_some_and(|detail| detail.family_member.id == id)
        {
            self.single_family_member = None;
        }
    }
}

fn cursor_of(page: Option<u32>, limit: Option<u32>) -> PageCursor {
    PageCursor::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_ADMIN_LIMIT))
}

pub fn reduce(mut state: UsersState, action: &UsersAction) -> UsersState {
    match action {
        UsersAction::ResetState => return UsersState::default(),
        UsersAction::FetchUsers(phase) => match phase {
            Phase::Request(query) => {
                state.request.begin();
                state.user_query = query.clone();
            }
            Phase::Success(paged) => {
                state.request.succeed();
                let cursor = PageCursor::new(state.user_query.page, state.user_query.limit);
                state.users = paged.clone().or_cursor(cursor).into();
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::FetchUserDetail(phase) => match phase {
            Phase::Request(_) => {
                state.request.begin();
                state.user_detail = None;
            }
            Phase::Success(detail) => {
                state.request.succeed();
                state.user_detail = Some(detail.clone());
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::DeleteUser(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(removed) => {
                state.request.succeed_with(removed.message.clone());
                state.users.remove_where(|user| user.id == removed.id);
                if state
                    .user_detail
                    .as_ref()
                    .is_some_and(|detail| detail.user.id == removed.id)
                {
                    state.user_detail = None;
                }
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::FetchFamilyMembers(phase) => match phase {
            Phase::Request(query) => {
                state.request.begin();
                state.member_query = query.clone();
            }
            Phase::Success(paged) => {
                state.request.succeed();
                let cursor = cursor_of(state.member_query.page, state.member_query.limit);
                state.family_members = paged.clone().or_cursor(cursor).into();
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::FetchSingleFamilyMember(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(detail) => {
                state.request.succeed();
                state.single_family_member = Some(detail.clone());
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::DeleteFamilyMember(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(removed) => {
                state.request.succeed_with(removed.message.clone());
                state.remove_family_member(&removed.id);
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::FetchScheduledCalls(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(paged) => {
                state.request.succeed();
                let search = &state.scheduled_calls_search_query;
                let cursor = cursor_of(search.page, search.limit);
                state.scheduled_calls = paged.clone().or_cursor(cursor).into();
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        UsersAction::UpdateScheduledCallsSearchQuery(patch) => {
            state.scheduled_calls_search_query.merge(patch);
        }
        UsersAction::DeleteScheduledCall(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(removed) => {
                state.request.succeed_with(removed.message.clone());
                state.scheduled_calls.remove_where(|call| call.id == removed.id);
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
    }
    state
}
