//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: in-memory registry/store wiring behind the core's traits
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use mentordesk_auth::{Hs256TokenVerifier, TokenVerifier};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let verifier = Arc::new(Hs256TokenVerifier::new(jwt_secret.as_bytes()));
    build_app_with(verifier, Arc::new(services::AppServices::new()))
}

/// Build the router around explicit collaborators (used by tests).
pub fn build_app_with(
    verifier: Arc<dyn TokenVerifier>,
    services: Arc<services::AppServices>,
) -> Router {
    let auth_state = middleware::AuthState { verifier };

    // Gate order: authentication, then tenant scoping, then handlers. The
    // role gate runs per operation inside the handlers.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(
            middleware::tenant_scope_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
