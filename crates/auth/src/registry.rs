//! Read-only lookup seams toward the persistence layer.
//!
//! The authorization core never writes through these; each check performs at
//! most one read to obtain the role or target-user snapshot it reasons about.

use mentordesk_core::{RoleId, UserId};

use crate::identity::UserRecord;
use crate::role::{RoleBinding, RoleCode};

/// Role definitions, keyed by id and by canonical code.
pub trait RoleRegistry: Send + Sync {
    fn role(&self, id: &RoleId) -> Option<RoleBinding>;

    fn role_by_code(&self, code: RoleCode) -> Option<RoleBinding>;
}

/// Pre-update snapshots of identity-management targets.
pub trait UserDirectory: Send + Sync {
    fn user(&self, id: &UserId) -> Option<UserRecord>;
}
