//! Hierarchy & Ownership Enforcer for identity-management writes.
//!
//! Users are the most security-sensitive resource in the platform: they carry
//! roles and tenant bindings themselves. Request-level gates cannot reason
//! about a *target* user, so the identity service routes every write through
//! the checks in this module before anything reaches persistence.
//!
//! Every check is a pure function of (principal, target snapshot, proposed
//! changes) and raises a typed failure rather than returning a boolean, so a
//! caller cannot silently ignore a violation. The composed operations
//! short-circuit on the first failure.
//!
//! # Invariants
//! - A target user in another tenant is untouchable for non-global callers.
//! - A caller can never grant a role of equal or greater power than its own.
//! - Only a global administrator may mint or assign the global role.
//! - A user holding the global role is never bound to a tenant; the write
//!   payload is normalized to guarantee it, not merely validated.
//! - A non-global caller cannot change their own role, tenant, or active
//!   status.

use mentordesk_core::{RoleId, TenantId, UserId};

use crate::error::{AuthzError, AuthzResult};
use crate::principal::Principal;
use crate::registry::RoleRegistry;
use crate::role::{RoleBinding, RoleRef};

/// Stored snapshot of an identity-management target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub tenant_id: Option<TenantId>,
    pub role_id: RoleId,
    pub active: bool,
    pub email: String,
    pub display_name: String,
}

/// Proposed data for a user create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub tenant_id: Option<TenantId>,
    pub role_id: RoleId,
    pub email: String,
    pub display_name: String,
}

/// Proposed field changes for a user update.
///
/// Outer `None` means the field was not touched. For `tenant_id`, the inner
/// option distinguishes "bind to this tenant" from "clear the binding".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub role_id: Option<RoleId>,
    pub tenant_id: Option<Option<TenantId>>,
    pub active: Option<bool>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Individual checks
// ─────────────────────────────────────────────────────────────────────────────

/// Check 1: a non-global caller may only touch users of its own tenant.
///
/// `action` is a human-readable verb used only in the error message.
pub fn ensure_tenant_ownership(
    principal: &Principal,
    target: &UserRecord,
    action: &str,
) -> AuthzResult<()> {
    if principal.is_global() {
        return Ok(());
    }
    if target.tenant_id != principal.tenant_id() {
        return Err(AuthzError::forbidden(format!(
            "cannot {action} users of another tenant"
        )));
    }
    Ok(())
}

/// Check 2: the role being granted must be strictly weaker than the caller's
/// own (lower level = more power). Global callers may assign any role.
pub fn ensure_may_assign(
    principal: &Principal,
    target_role: &RoleBinding,
    roles: &dyn RoleRegistry,
    action: &str,
) -> AuthzResult<()> {
    if principal.is_global() {
        return Ok(());
    }

    let caller_level = caller_level(principal, roles)?;
    if target_role.level <= caller_level {
        return Err(AuthzError::forbidden(format!(
            "cannot {action} a user with an equal-or-higher role"
        )));
    }
    Ok(())
}

/// Check 3: only a global administrator may create or assign the global role.
pub fn ensure_global_grant(principal: &Principal, target_role: &RoleBinding) -> AuthzResult<()> {
    if target_role.code.is_global() && !principal.is_global() {
        return Err(AuthzError::forbidden(
            "only a global administrator may create or assign the global role",
        ));
    }
    Ok(())
}

/// Check 4 (validation half): a global-role write must not carry a tenant.
///
/// The composed operations normalize the payload before running this, so it
/// only fires for callers that bypass [`normalize_global_tenant`].
pub fn ensure_global_tenant_exclusive(
    target_role: &RoleBinding,
    tenant_id: Option<TenantId>,
) -> AuthzResult<()> {
    if target_role.code.is_global() && tenant_id.is_some() {
        return Err(AuthzError::forbidden(
            "users with the global role cannot be bound to a tenant",
        ));
    }
    Ok(())
}

/// Check 4 (normalization half): force the tenant binding to `None` when the
/// assigned role is global, regardless of what was supplied.
pub fn normalize_global_tenant(target_role: &RoleBinding, tenant_id: &mut Option<TenantId>) {
    if target_role.code.is_global() {
        *tenant_id = None;
    }
}

/// Check 5: a non-global caller updating their own record may not change
/// role, tenant, or active status. Setting a field to its current value is
/// not a change.
pub fn ensure_self_edit_allowed(
    principal: &Principal,
    target: &UserRecord,
    changes: &UserChanges,
) -> AuthzResult<()> {
    if target.id != principal.id() || principal.is_global() {
        return Ok(());
    }

    let touches_privileged = changes.role_id.is_some_and(|r| r != target.role_id)
        || changes.tenant_id.is_some_and(|t| t != target.tenant_id)
        || changes.active.is_some_and(|a| a != target.active);

    if touches_privileged {
        return Err(AuthzError::forbidden(
            "cannot change your own role, tenant, or active status",
        ));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Composed operations
// ─────────────────────────────────────────────────────────────────────────────

/// Authorize a user create and return the normalized payload.
///
/// Check order: elevation, then global-grant, then tenant exclusivity. There
/// is no pre-existing target, so tenant ownership does not apply; the
/// request-level tenant gate already scoped the supplied tenant.
pub fn authorize_user_create(
    principal: &Principal,
    mut new_user: NewUser,
    roles: &dyn RoleRegistry,
) -> AuthzResult<NewUser> {
    let role = lookup_role(roles, &new_user.role_id)?;

    ensure_may_assign(principal, &role, roles, "create")?;
    ensure_global_grant(principal, &role)?;
    normalize_global_tenant(&role, &mut new_user.tenant_id);
    ensure_global_tenant_exclusive(&role, new_user.tenant_id)?;

    Ok(new_user)
}

/// Authorize a user update and return the normalized changes.
///
/// Check order: tenant ownership, self-edit restriction, then (when the role
/// actually changes) elevation and global-grant, then tenant exclusivity over
/// the effective post-write state.
pub fn authorize_user_update(
    principal: &Principal,
    target: &UserRecord,
    mut changes: UserChanges,
    roles: &dyn RoleRegistry,
    action: &str,
) -> AuthzResult<UserChanges> {
    ensure_tenant_ownership(principal, target, action)?;
    ensure_self_edit_allowed(principal, target, &changes)?;

    let effective_role_id = changes.role_id.unwrap_or(target.role_id);
    let role = lookup_role(roles, &effective_role_id)?;

    if changes.role_id.is_some_and(|id| id != target.role_id) {
        ensure_may_assign(principal, &role, roles, action)?;
        ensure_global_grant(principal, &role)?;
    }

    // The write must leave the target tenant-free whenever its effective role
    // is global, even if the role itself was not touched by this update.
    let effective_tenant = changes.tenant_id.unwrap_or(target.tenant_id);
    if role.code.is_global() && effective_tenant.is_some() {
        changes.tenant_id = Some(None);
    }
    ensure_global_tenant_exclusive(&role, changes.tenant_id.unwrap_or(target.tenant_id))?;

    Ok(changes)
}

fn lookup_role(roles: &dyn RoleRegistry, id: &RoleId) -> AuthzResult<RoleBinding> {
    roles.role(id).ok_or(AuthzError::NotFound)
}

/// Resolve the caller's own privilege level.
///
/// A structured binding carries its level; a legacy string resolves through
/// the registry by code. An unrecognized caller role fails closed.
fn caller_level(principal: &Principal, roles: &dyn RoleRegistry) -> AuthzResult<u8> {
    if let Some(level) = principal.role().level() {
        return Ok(level);
    }

    principal
        .role()
        .code()
        .and_then(|code| roles.role_by_code(code))
        .map(|binding| binding.level)
        .ok_or_else(|| AuthzError::forbidden("caller role is not recognized"))
}
