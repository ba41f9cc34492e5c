use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::app::services::AppServices;

/// GET /roles — the fixed role ladder. Role-agnostic (any authenticated
/// principal may inspect it).
pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let roles: Vec<_> = services
        .roles()
        .all()
        .into_iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id.to_string(),
                "code": r.code.as_str(),
                "level": r.level,
            })
        })
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "roles": roles }))).into_response()
}
