use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo::User;

/// Request body for the profile update. All fields optional; present
/// fields must be non-empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Public part of a user exposed by the search endpoint. The id is
/// serialized as `_id` for compatibility with existing clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub user: Vec<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub struct BulkQuery {
    #[serde(default)]
    pub filter: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn summary_uses_wire_field_names() {
        let summary = UserSummary::from(User {
            id: Uuid::new_v4(),
            username: "a@b.com".into(),
            first_name: "Pia".into(),
            last_name: "Stone".into(),
            password_hash: "hash".into(),
            created_at: OffsetDateTime::now_utc(),
        });
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("_id").is_some());
        assert_eq!(json["firstName"], "Pia");
        assert_eq!(json["lastName"], "Stone");
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn update_request_fields_are_optional() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"firstName":"New"}"#).unwrap();
        assert_eq!(req.first_name.as_deref(), Some("New"));
        assert!(req.last_name.is_none());
        assert!(req.password.is_none());
    }

    #[test]
    fn bulk_query_filter_defaults_to_empty() {
        let q: BulkQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.filter, "");
    }
}
