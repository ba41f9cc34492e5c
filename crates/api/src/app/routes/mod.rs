use axum::{Router, routing::get};

pub mod roles;
pub mod system;
pub mod users;

/// Router for all authenticated (gate-protected) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/roles", get(roles::list_roles))
        .route("/tenants/:tenant_id/users", get(users::list_tenant_users))
        .nest("/users", users::router())
}
