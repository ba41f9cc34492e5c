//! Request/response DTOs and JSON mapping helpers.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use mentordesk_auth::UserRecord;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Omitted for global-role users; defaulted to the caller's own tenant
    /// otherwise.
    pub tenant_id: Option<Uuid>,
    pub role_id: Uuid,
    pub email: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// Absent = untouched; `null` = clear the binding.
    #[serde(default, deserialize_with = "double_option")]
    pub tenant_id: Option<Option<Uuid>>,
    pub role_id: Option<Uuid>,
    pub active: Option<bool>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role_id: Uuid,
}

/// Distinguish an absent field from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

pub fn user_to_json(user: &UserRecord) -> serde_json::Value {
    serde_json::json!({
        "id": user.id.to_string(),
        "tenant_id": user.tenant_id.map(|t| t.to_string()),
        "role_id": user.role_id.to_string(),
        "active": user.active,
        "email": user.email,
        "display_name": user.display_name,
    })
}
