//! `mentordesk-api` — HTTP surface for the authorization core.
//!
//! Every protected route sits behind two request-level gates (authentication
//! and tenant scoping); identity-management routes additionally run the
//! hierarchy/ownership checks at the service boundary.

pub mod app;
pub mod middleware;
