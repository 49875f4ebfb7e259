//! Admin console models: registered users and the admin list queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::SparseQuery;
use crate::model::EmbeddedEntity;

pub const DEFAULT_ADMIN_LIMIT: u32 = 10;

/// A registered account as listed in the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A family link as embedded in a user detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedFamilyMember {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<EmbeddedEntity>,
}

/// One user with their family links, as shown on the admin detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: AdminUser,
    #[serde(default)]
    pub family_members: Vec<LinkedFamilyMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSearchField {
    Name,
    Email,
    PhoneNumber,
}

impl UserSearchField {
    pub fn param(self) -> &'static str {
        match self {
            UserSearchField::Name => "name",
            UserSearchField::Email => "email",
            UserSearchField::PhoneNumber => "phoneNumber",
        }
    }
}

/// Filters of the admin user list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<UserSearchField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_in_between_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_in_between_end_date: Option<String>,
    /// Additional backend filters passed through verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Page plus filters of the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(default)]
    pub filters: UserFilters,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_ADMIN_LIMIT,
            filters: UserFilters::default(),
        }
    }
}

impl UserQuery {
    pub fn to_query(&self) -> SparseQuery {
        let mut query = SparseQuery::new();
        query
            .push_positive("page", Some(self.page))
            .push_positive("limit", Some(self.limit));

        let filters = &self.filters;
        if let (Some(search), Some(field)) = (filters.search.as_deref(), filters.search_type) {
            query.push(field.param(), search.trim());
        }
        if filters.is_verified == Some(true) {
            query.push("isVerified", true);
        }
        query
            .push_opt(
                "createdAtInBetweenStartDate",
                filters.created_at_in_between_start_date.as_deref(),
            )
            .push_opt(
                "createdAtInBetweenEndDate",
                filters.created_at_in_between_end_date.as_deref(),
            );
        for (key, value) in &filters.extra {
            if matches!(key.as_str(), "name" | "email" | "phoneNumber" | "page" | "limit") {
                continue;
            }
            query.push(key, value);
        }
        query
    }
}

/// Filters of the admin family member list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_in_between_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_in_between_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_to_primary_user_name: Option<String>,
}

impl MemberQuery {
    pub fn to_query(&self) -> SparseQuery {
        let mut query = SparseQuery::new();
        query
            .push_opt("name", self.name.as_deref())
            .push_opt("email", self.email.as_deref())
            .push_opt("phoneNumber", self.phone_number.as_deref())
            .push_opt("isUser", self.is_user)
            .push_opt("createdAtStartDate", self.created_at_start_date.as_deref())
            .push_opt("createdAtEndDate", self.created_at_end_date.as_deref())
            .push_opt(
                "modifiedInBetweenStartDate",
                self.modified_in_between_start_date.as_deref(),
            )
            .push_opt(
                "modifiedInBetweenEndDate",
                self.modified_in_between_end_date.as_deref(),
            )
            .push_opt(
                "linkedToPrimaryUserName",
                self.linked_to_primary_user_name.as_deref(),
            )
            .push_positive("page", self.page)
            .push_positive("limit", self.limit);
        query
    }
}

/// Search form of the admin call history.
///
/// Also used as a patch: [`AdminCallQuery::merge`] overlays only the fields
/// that are present, and `Some("")` clears a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCallQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_to_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tries_left: Option<String>,
}

impl AdminCallQuery {
    pub fn merge(&mut self, patch: &AdminCallQuery) {
        fn overlay<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }
        overlay(&mut self.page, &patch.page);
        overlay(&mut self.limit, &patch.limit);
        overlay(&mut self.recipient_name, &patch.recipient_name);
        overlay(&mut self.scheduled_by_name, &patch.scheduled_by_name);
        overlay(&mut self.scheduled_to_name, &patch.scheduled_to_name);
        overlay(&mut self.recipient_number, &patch.recipient_number);
        overlay(&mut self.min_duration, &patch.min_duration);
        overlay(&mut self.max_duration, &patch.max_duration);
        overlay(&mut self.status, &patch.status);
        overlay(&mut self.tries_left, &patch.tries_left);
    }

    pub fn to_query(&self) -> SparseQuery {
        let mut query = SparseQuery::new();
        query
            .push_positive("page", self.page)
            .push_positive("limit", self.limit)
            .push_opt("recipientName", self.recipient_name.as_deref())
            .push_opt("scheduledByName", self.scheduled_by_name.as_deref())
            .push_opt("scheduledToName", self.scheduled_to_name.as_deref())
            .push_opt("recipientNumber", self.recipient_number.as_deref())
            .push_opt("minDuration", self.min_duration.as_deref())
            .push_opt("maxDuration", self.max_duration.as_deref())
            .push_opt("status", self.status.as_deref())
            .push_opt("triesLeft", self.tries_left.as_deref());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_query_maps_search_field() {
        let query = UserQuery {
            page: 2,
            limit: 10,
            filters: UserFilters {
                search: Some("  asha ".into()),
                search_type: Some(UserSearchField::Email),
                is_verified: Some(false),
                extra: BTreeMap::from([
                    ("role".to_string(), "user".to_string()),
                    ("name".to_string(), "ignored".to_string()),
                    ("blank".to_string(), String::new()),
                ]),
                ..Default::default()
            },
        }
        .to_query();

        assert_eq!(query.get("email"), Some("asha"));
        assert_eq!(query.get("name"), None);
        assert_eq!(query.get("isVerified"), None);
        assert_eq!(query.get("role"), Some("user"));
        assert_eq!(query.get("blank"), None);
        assert_eq!(query.get("page"), Some("2"));
    }

    #[test]
    fn test_member_query_keeps_false_flag() {
        let query = MemberQuery {
            is_user: Some(false),
            name: Some(String::new()),
            ..Default::default()
        }
        .to_query();
        assert_eq!(query.get("isUser"), Some("false"));
        assert_eq!(query.get("name"), None);
    }

    #[test]
    fn test_admin_call_query_merge() {
        let mut query = AdminCallQuery {
            recipient_name: Some("Ravi".into()),
            status: Some("pending".into()),
            ..Default::default()
        };
        query.merge(&AdminCallQuery {
            status: Some(String::new()),
            tries_left: Some("1".into()),
            ..Default::default()
        });

        assert_eq!(query.recipient_name.as_deref(), Some("Ravi"));
        assert_eq!(query.status.as_deref(), Some(""));
        assert_eq!(query.to_query().get("status"), None);
        assert_eq!(query.to_query().get("triesLeft"), Some("1"));
    }

    #[test]
    fn test_user_detail_flattened() {
        let detail: UserDetail = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Asha",
            "isVerified": true,
            "familyMembers": [
                {"_id": "f1", "relationship": "Mother", "member": {"_id": "m1", "name": "Lata"}}
            ]
        }))
        .unwrap();
        assert_eq!(detail.user.id, "u1");
        assert_eq!(detail.family_members[0].member.as_ref().unwrap().id, "m1");
    }
}
