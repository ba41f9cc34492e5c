//! The authenticated caller of the current request.

use mentordesk_core::{TenantId, UserId};

use crate::role::RoleRef;

/// A fully resolved principal for authorization decisions.
///
/// Constructed once per request by the principal resolver (token
/// verification), immutable, and discarded at request end. Every gate and
/// check takes it as an explicit argument.
///
/// Invariant: `tenant_id` is `None` only when the role resolves to the global
/// code (enforced by claims validation at the resolver boundary).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    role: RoleRef,
    tenant_id: Option<TenantId>,
}

impl Principal {
    pub fn new(id: UserId, role: RoleRef, tenant_id: Option<TenantId>) -> Self {
        Self {
            id,
            role,
            tenant_id,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn role(&self) -> &RoleRef {
        &self.role
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Whether this principal carries the global role (bypasses tenant
    /// scoping entirely).
    pub fn is_global(&self) -> bool {
        self.role.is_global()
    }
}
