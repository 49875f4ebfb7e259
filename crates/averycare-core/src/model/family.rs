//! Family member models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::EntityRef;

/// A person the user schedules calls for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "phone", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// The registered account this member is linked to, if any.
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub linked_user: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FamilyMember {
    /// Overlays every field present in `patch`; absent fields keep their value.
    pub fn apply(&mut self, patch: &FamilyMemberPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(relationship) = &patch.relationship {
            self.relationship = Some(relationship.clone());
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(phone_number) = &patch.phone_number {
            self.phone_number = Some(phone_number.clone());
        }
        if let Some(linked_user) = &patch.linked_user {
            self.linked_user = Some(linked_user.clone());
        }
        if let Some(is_user) = patch.is_user {
            self.is_user = Some(is_user);
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = Some(created_at);
        }
        if let Some(updated_at) = patch.updated_at {
            self.updated_at = Some(updated_at);
        }
    }
}

/// Partial family member as returned by the update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberPatch {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, alias = "phone", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    pub linked_user: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Form data for creating or editing a family member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Pagination metadata of the user-facing family list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyPageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_family_limit")]
    pub limit: u32,
    #[serde(default)]
    pub remaining: u64,
    #[serde(default)]
    pub has_next_page: bool,
}

pub const DEFAULT_FAMILY_LIMIT: u32 = 5;

fn default_page() -> u32 {
    1
}

fn default_family_limit() -> u32 {
    DEFAULT_FAMILY_LIMIT
}

impl FamilyPageMeta {
    /// Metadata assumed when the backend omits it.
    pub fn fallback(page: u32, limit: u32) -> Self {
        Self {
            total: 0,
            page,
            limit,
            remaining: 0,
            has_next_page: false,
        }
    }

    pub fn total_pages(&self) -> u32 {
        crate::model::page::total_pages(self.total, self.limit)
    }

    /// Keeps `page` within `[1, total_pages]`.
    pub fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }
}

impl Default for FamilyPageMeta {
    fn default() -> Self {
        Self::fallback(1, DEFAULT_FAMILY_LIMIT)
    }
}

/// A normalized page of family members as delivered to the family slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyPage {
    pub data: Vec<FamilyMember>,
    pub meta: FamilyPageMeta,
}
