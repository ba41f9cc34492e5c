//! Authorization error taxonomy.
//!
//! Every variant is terminal for the current request; nothing here is
//! retriable. The transport layer maps these onto HTTP statuses.

use thiserror::Error;

/// Result type used across the authorization core.
pub type AuthzResult<T> = Result<T, AuthzError>;

/// Outcome of a failed authorization check.
///
/// Checks fail closed: a missing principal, an unresolvable role, or a
/// malformed identifier is always a denial, never an implicit allow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No valid principal could be resolved for the request (401).
    #[error("authentication required")]
    Unauthenticated,

    /// Principal resolved but the operation is disallowed (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A referenced role or target user does not exist (404).
    #[error("not found")]
    NotFound,
}

impl AuthzError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}
