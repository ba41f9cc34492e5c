//! Identity-management endpoints.
//!
//! Mutating handlers pass the role gate (self-targeted updates excepted),
//! then hand the write to the service layer, which runs the
//! hierarchy/ownership checks in the mandated order before touching the
//! store.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use mentordesk_auth::{
    NewUser, Principal, RoleCode, UserChanges, UserDirectory, identity, require_role,
};
use mentordesk_core::{RoleId, TenantId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Roles allowed to manage users at all; the enforcer narrows what each may
/// actually do to a given target.
const USER_MANAGERS: &[RoleCode] = &[RoleCode::GlobalAdmin, RoleCode::Consultant, RoleCode::Manager];

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user).patch(update_user).delete(deactivate_user))
        .route("/:id/reactivate", post(reactivate_user))
        .route("/:id/role", put(assign_role))
}

/// GET /tenants/:tenant_id/users — list a tenant's users.
///
/// The tenant gate already scoped the route parameter to the caller (or the
/// caller is global), so the handler only parses and reads.
pub async fn list_tenant_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(tenant_id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = require_role(USER_MANAGERS, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    let tenant_id = match tenant_id.parse::<TenantId>() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let users: Vec<_> = services
        .users_in_tenant(tenant_id)
        .iter()
        .map(dto::user_to_json)
        .collect();

    (StatusCode::OK, Json(serde_json::json!({ "users": users }))).into_response()
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = require_role(USER_MANAGERS, Some(&principal)) {
        return errors::authz_error_to_response(e);
    }

    // A missing tenant defaults to the caller's own; the tenant gate already
    // scoped any explicit value.
    let tenant_id = body
        .tenant_id
        .map(TenantId::from_uuid)
        .or(principal.tenant_id());

    let new_user = NewUser {
        id: UserId::new(),
        tenant_id,
        role_id: RoleId::from_uuid(body.role_id),
        email: body.email,
        display_name: body.display_name,
    };

    match services.create_user(&principal, new_user) {
        Ok(user) => (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::authz_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_user_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let Some(user) = services.user(&id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found");
    };

    if let Err(e) = identity::ensure_tenant_ownership(&principal, &user, "view") {
        return errors::authz_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::user_to_json(&user))).into_response()
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let changes = UserChanges {
        role_id: body.role_id.map(RoleId::from_uuid),
        tenant_id: body.tenant_id.map(|t| t.map(TenantId::from_uuid)),
        active: body.active,
        email: body.email,
        display_name: body.display_name,
    };
    apply_update(services, principal, &id, changes, "update").await
}

pub async fn deactivate_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let changes = UserChanges {
        active: Some(false),
        ..Default::default()
    };
    apply_update(services, principal, &id, changes, "deactivate").await
}

pub async fn reactivate_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let changes = UserChanges {
        active: Some(true),
        ..Default::default()
    };
    apply_update(services, principal, &id, changes, "reactivate").await
}

pub async fn assign_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<dto::AssignRoleRequest>,
) -> axum::response::Response {
    let changes = UserChanges {
        role_id: Some(RoleId::from_uuid(body.role_id)),
        ..Default::default()
    };
    apply_update(services, principal, &id, changes, "assign a role to").await
}

async fn apply_update(
    services: Arc<AppServices>,
    principal: Principal,
    id: &str,
    changes: UserChanges,
    action: &str,
) -> axum::response::Response {
    let id = match parse_user_id(id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Self-targeted updates are exempt from the allow-list: any principal may
    // edit their own profile, and the self-edit check bounds what such an
    // update may touch.
    if id != principal.id() {
        if let Err(e) = require_role(USER_MANAGERS, Some(&principal)) {
            return errors::authz_error_to_response(e);
        }
    }

    match services.update_user(&principal, id, changes, action) {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::authz_error_to_response(e),
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse::<UserId>().map_err(errors::domain_error_to_response)
}
