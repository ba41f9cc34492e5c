//! Service wiring: in-memory role registry and user store.
//!
//! These stand in for the external persistence layer at the interface the
//! authorization core defines ([`RoleRegistry`], [`UserDirectory`]); every
//! identity write flows through the enforcer before it reaches the store.

use std::{
    collections::HashMap,
    sync::Mutex,
};

use mentordesk_auth::{
    AuthzError, AuthzResult, NewUser, Principal, RoleBinding, RoleCode, RoleRegistry, UserChanges,
    UserDirectory, UserRecord, authorize_user_create, authorize_user_update,
};
use mentordesk_core::{RoleId, TenantId, UserId};

/// Fixed role ladder, seeded at startup.
pub struct InMemoryRoleRegistry {
    by_id: HashMap<RoleId, RoleBinding>,
}

impl InMemoryRoleRegistry {
    pub fn seeded() -> Self {
        let mut by_id = HashMap::new();
        for code in [
            RoleCode::GlobalAdmin,
            RoleCode::Consultant,
            RoleCode::Manager,
            RoleCode::Contributor,
            RoleCode::ReadOnly,
        ] {
            let binding = RoleBinding {
                id: RoleId::new(),
                code,
                level: code.default_level(),
            };
            by_id.insert(binding.id, binding);
        }
        Self { by_id }
    }

    pub fn all(&self) -> Vec<RoleBinding> {
        let mut roles: Vec<_> = self.by_id.values().copied().collect();
        roles.sort_by_key(|r| r.level);
        roles
    }
}

impl RoleRegistry for InMemoryRoleRegistry {
    fn role(&self, id: &RoleId) -> Option<RoleBinding> {
        self.by_id.get(id).copied()
    }

    fn role_by_code(&self, code: RoleCode) -> Option<RoleBinding> {
        self.by_id.values().find(|b| b.code == code).copied()
    }
}

pub struct AppServices {
    roles: InMemoryRoleRegistry,
    users: Mutex<HashMap<UserId, UserRecord>>,
}

impl AppServices {
    pub fn new() -> Self {
        Self {
            roles: InMemoryRoleRegistry::seeded(),
            users: Mutex::new(HashMap::new()),
        }
    }

    pub fn roles(&self) -> &InMemoryRoleRegistry {
        &self.roles
    }

    pub fn users_in_tenant(&self, tenant: TenantId) -> Vec<UserRecord> {
        let users = self.users.lock().unwrap();
        let mut records: Vec<_> = users
            .values()
            .filter(|u| u.tenant_id == Some(tenant))
            .cloned()
            .collect();
        records.sort_by_key(|u| *u.id.as_uuid());
        records
    }

    /// Create a user after the full create-order check sequence; returns the
    /// stored (normalized) record.
    pub fn create_user(&self, principal: &Principal, new_user: NewUser) -> AuthzResult<UserRecord> {
        let normalized = authorize_user_create(principal, new_user, &self.roles)?;

        let record = UserRecord {
            id: normalized.id,
            tenant_id: normalized.tenant_id,
            role_id: normalized.role_id,
            active: true,
            email: normalized.email,
            display_name: normalized.display_name,
        };

        self.users
            .lock()
            .unwrap()
            .insert(record.id, record.clone());

        tracing::debug!(user_id = %record.id, "user created");
        Ok(record)
    }

    /// Apply an update after the full update-order check sequence.
    ///
    /// `action` is the human-readable verb surfaced in denial messages.
    pub fn update_user(
        &self,
        principal: &Principal,
        id: UserId,
        changes: UserChanges,
        action: &str,
    ) -> AuthzResult<UserRecord> {
        let target = self.user(&id).ok_or(AuthzError::NotFound)?;
        let normalized = authorize_user_update(principal, &target, changes, &self.roles, action)?;

        let mut users = self.users.lock().unwrap();
        let record = users.get_mut(&id).ok_or(AuthzError::NotFound)?;

        if let Some(role_id) = normalized.role_id {
            record.role_id = role_id;
        }
        if let Some(tenant_id) = normalized.tenant_id {
            record.tenant_id = tenant_id;
        }
        if let Some(active) = normalized.active {
            record.active = active;
        }
        if let Some(email) = normalized.email {
            record.email = email;
        }
        if let Some(display_name) = normalized.display_name {
            record.display_name = display_name;
        }

        tracing::debug!(user_id = %record.id, action, "user updated");
        Ok(record.clone())
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for AppServices {
    fn user(&self, id: &UserId) -> Option<UserRecord> {
        self.users.lock().unwrap().get(id).cloned()
    }
}
