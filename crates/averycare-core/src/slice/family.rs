//! User-facing family member slice.
//!
//! Members are stored once, keyed by id, with a separate display order.
//! The selected member is an id into that map, so updates applied to the
//! stored entity are visible through the selection as well.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::{Acknowledged, Phase, Removed, Stage};
use crate::model::family::DEFAULT_FAMILY_LIMIT;
use crate::model::{
    FamilyMember, FamilyMemberForm, FamilyMemberPatch, FamilyPage, FamilyPageMeta, PageCursor,
    RequestState,
};

/// Edit of one member: the id plus the fields to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMemberUpdate {
    pub id: String,
    pub data: FamilyMemberForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum FamilyAction {
    FetchFamilyMembers(Phase<PageCursor, FamilyPage>),
    AddFamilyMember(Phase<FamilyMemberForm, Acknowledged>),
    DeleteFamilyMember(Phase<String, Removed>),
    UpdateFamilyMember(Phase<FamilyMemberUpdate, FamilyMemberPatch>),
    SetSelectedFamilyMember(Option<String>),
}

impl FamilyAction {
    pub fn operation(&self) -> &'static str {
        match self {
            FamilyAction::FetchFamilyMembers(_) => "family/fetchFamilyMembers",
            FamilyAction::AddFamilyMember(_) => "family/addFamilyMember",
            FamilyAction::DeleteFamilyMember(_) => "family/deleteFamilyMember",
            FamilyAction::UpdateFamilyMember(_) => "family/updateFamilyMember",
            FamilyAction::SetSelectedFamilyMember(_) => "family/setSelectedFamilyMember",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            FamilyAction::FetchFamilyMembers(p) => p.stage(),
            FamilyAction::AddFamilyMember(p) => p.stage(),
            FamilyAction::DeleteFamilyMember(p) => p.stage(),
            FamilyAction::UpdateFamilyMember(p) => p.stage(),
            FamilyAction::SetSelectedFamilyMember(_) => Stage::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyState {
    entities: HashMap<String, FamilyMember>,
    order: Vec<String>,
    pub meta: FamilyPageMeta,
    pub selected_id: Option<String>,
    #[serde(flatten)]
    pub request: RequestState,
}

impl Default for FamilyState {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            meta: FamilyPageMeta::fallback(1, DEFAULT_FAMILY_LIMIT),
            selected_id: None,
            request: RequestState::default(),
        }
    }
}

impl FamilyState {
    /// Members of the current page in display order.
    pub fn members(&self) -> impl Iterator<Item = &FamilyMember> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn member(&self, id: &str) -> Option<&FamilyMember> {
        self.entities.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn selected(&self) -> Option<&FamilyMember> {
        self.selected_id.as_deref().and_then(|id| self.entities.get(id))
    }

    /// Cursor of the last loaded page.
    pub fn cursor(&self) -> PageCursor {
        PageCursor::new(self.meta.page.max(1), self.meta.limit)
    }

    fn replace_page(&mut self, page: &FamilyPage) {
        self.entities.clear();
        self.order.clear();
        for member in &page.data {
            if self.entities.insert(member.id.clone(), member.clone()).is_none() {
                self.order.push(member.id.clone());
            }
        }
        self.meta = page.meta;
        self.meta.clamp_page();
    }

    fn remove(&mut self, id: &str) {
        if self.entities.remove(id).is_some() {
            self.order.retain(|existing| existing != id);
            self.meta.total = self.meta.total.saturating_sub(1);
            self.meta.clamp_page();
        }
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
    }
}

pub fn reduce(mut state: FamilyState, action: &FamilyAction) -> FamilyState {
    match action {
        FamilyAction::FetchFamilyMembers(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(page) => {
                state.request.succeed();
                state.replace_page(page);
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        FamilyAction::AddFamilyMember(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(ack) => state.request.succeed_with(ack.message.clone()),
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        FamilyAction::DeleteFamilyMember(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(removed) => {
                state.request.succeed_with(removed.message.clone());
                state.remove(&removed.id);
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        FamilyAction::UpdateFamilyMember(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(patch) => {
                state.request.succeed();
                if let Some(member) = state.entities.get_mut(&patch.id) {
                    member.apply(patch);
                }
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        FamilyAction::SetSelectedFamilyMember(id) => {
            state.selected_id = id.clone();
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(id: &str, name: &str) -> FamilyMember {
        serde_json::from_value(json!({"_id": id, "name": name, "relationship": "Parent"})).unwrap()
    }

    fn loaded() -> FamilyState {
        let page = FamilyPage {
            data: vec![member("m1", "Ravi"), member("m2", "Meera")],
            meta: FamilyPageMeta {
                total: 7,
                page: 2,
                limit: 5,
                remaining: 0,
                has_next_page: false,
            },
        };
        reduce(
            FamilyState::default(),
            &FamilyAction::FetchFamilyMembers(Phase::Success(page)),
        )
    }

    #[test]
    fn test_fetch_keeps_order_and_meta() {
        let state = loaded();
        let names: Vec<_> = state.members().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Ravi", "Meera"]);
        assert_eq!(state.cursor(), PageCursor::new(2, 5));
        assert_eq!(state.meta.total_pages(), 2);
    }

    #[test]
    fn test_update_is_visible_through_selection() {
        let state = reduce(
            loaded(),
            &FamilyAction::SetSelectedFamilyMember(Some("m2".into())),
        );
        let patch = FamilyMemberPatch {
            id: "m2".into(),
            phone_number: Some("+922".into()),
            ..Default::default()
        };
        let state = reduce(state, &FamilyAction::UpdateFamilyMember(Phase::Success(patch)));

        let selected = state.selected().unwrap();
        assert_eq!(selected.phone_number.as_deref(), Some("+922"));
        assert_eq!(selected.name, "Meera");
    }

    #[test]
    fn test_delete_removes_member_and_selection() {
        let state = reduce(
            loaded(),
            &FamilyAction::SetSelectedFamilyMember(Some("m1".into())),
        );
        let state = reduce(
            state,
            &FamilyAction::DeleteFamilyMember(Phase::Success(Removed::new("m1", None))),
        );

        assert_eq!(state.len(), 1);
        assert!(state.member("m1").is_none());
        assert!(state.selected_id.is_none());
        assert_eq!(state.meta.total, 6);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let page = FamilyPage {
            data: vec![member("m1", "Ravi")],
            meta: FamilyPageMeta {
                total: 7,
                page: 9,
                limit: 5,
                remaining: 0,
                has_next_page: false,
            },
        };
        let state = reduce(
            FamilyState::default(),
            &FamilyAction::FetchFamilyMembers(Phase::Success(page)),
        );
        assert_eq!(state.meta.page, 2);
        assert_eq!(state.cursor(), PageCursor::new(2, 5));
    }

    #[test]
    fn test_delete_of_last_item_on_last_page_moves_cursor_back() {
        let page = FamilyPage {
            data: vec![member("m6", "Asha")],
            meta: FamilyPageMeta {
                total: 6,
                page: 2,
                limit: 5,
                remaining: 0,
                has_next_page: false,
            },
        };
        let state = reduce(
            FamilyState::default(),
            &FamilyAction::FetchFamilyMembers(Phase::Success(page)),
        );
        let state = reduce(
            state,
            &FamilyAction::DeleteFamilyMember(Phase::Success(Removed::new("m6", None))),
        );
        assert_eq!(state.meta.total, 5);
        assert_eq!(state.cursor(), PageCursor::new(1, 5));
    }

    #[test]
    fn test_failure_keeps_data() {
        let state = reduce(
            loaded(),
            &FamilyAction::FetchFamilyMembers(Phase::Request(PageCursor::new(3, 5))),
        );
        assert!(state.request.loading);
        let state = reduce(
            state,
            &FamilyAction::FetchFamilyMembers(Phase::Failure("Failed to fetch members".into())),
        );
        assert!(!state.request.loading);
        assert_eq!(state.len(), 2);
        assert_eq!(state.request.error.as_deref(), Some("Failed to fetch members"));
    }
}
