use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use mentordesk_auth::Principal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "id": principal.id().to_string(),
        "role": principal.role().code_str(),
        "tenant_id": principal.tenant_id().map(|t| t.to_string()),
    }))
}
