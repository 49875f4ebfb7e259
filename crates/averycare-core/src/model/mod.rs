//! Domain models mirrored from the backend.

pub mod call;
pub mod family;
pub mod page;
pub mod request_state;
pub mod user;

use serde::{Deserialize, Serialize};

pub use call::{
    CallQuery, CallStatus, DeleteCallPayload, ReschedulePayload, ScheduleCallPayload,
    ScheduledCall, TranscriptEntry,
};
pub use family::{FamilyMember, FamilyMemberForm, FamilyMemberPatch, FamilyPage, FamilyPageMeta};
pub use page::{Page, PageCursor, Paged};
pub use request_state::RequestState;
pub use user::{
    AdminCallQuery, AdminUser, LinkedFamilyMember, MemberQuery, UserDetail, UserFilters, UserQuery,
    UserSearchField,
};

/// A reference to another backend record: either a bare id or the record
/// embedded by the backend (populated reference).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Id(String),
    Embedded(EmbeddedEntity),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedEntity {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl EntityRef {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Embedded(entity) => &entity.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Embedded(entity) => entity.name.as_deref(),
        }
    }
}
