//! `mentordesk-auth` — pure authentication/authorization boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage. Every gate and
//! check takes the [`Principal`] as an explicit argument; nothing reads from
//! ambient state, and every denial is a typed error the caller cannot ignore.

pub mod claims;
pub mod error;
pub mod identity;
pub mod principal;
pub mod registry;
pub mod role;
pub mod role_gate;
pub mod tenant_scope;

pub use claims::{
    AccessClaims, Hs256TokenVerifier, TokenError, TokenValidationError, TokenVerifier,
    validate_claims,
};
pub use error::{AuthzError, AuthzResult};
pub use identity::{
    NewUser, UserChanges, UserRecord, authorize_user_create, authorize_user_update,
};
pub use principal::Principal;
pub use registry::{RoleRegistry, UserDirectory};
pub use role::{RoleBinding, RoleCode, RoleRef};
pub use role_gate::require_role;
pub use tenant_scope::{enforce_tenant_scope, requested_tenant};
