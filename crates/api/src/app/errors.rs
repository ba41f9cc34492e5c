use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use mentordesk_auth::AuthzError;
use mentordesk_core::DomainError;

/// Map an authorization failure onto its HTTP status.
///
/// Denials are logged here, at the single choke point, so the pure checks in
/// `mentordesk-auth` stay IO-free.
pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    match err {
        AuthzError::Unauthenticated => {
            tracing::warn!("request rejected: unauthenticated");
            json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "authentication required",
            )
        }
        AuthzError::Forbidden(msg) => {
            tracing::warn!(reason = %msg, "request rejected: forbidden");
            json_error(StatusCode::FORBIDDEN, "forbidden", msg)
        }
        AuthzError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
