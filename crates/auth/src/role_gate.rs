//! Role Gate: declarative per-operation role allow-lists.
//!
//! Independent of and composing with the Tenant-Scope Gate; both must pass
//! before a handler runs, in either order.

use crate::error::{AuthzError, AuthzResult};
use crate::principal::Principal;
use crate::role::RoleCode;

/// Enforce an operation's role allow-list.
///
/// An empty allow-list means the operation is role-agnostic and always
/// passes. Otherwise membership is an exact, case-sensitive match on the
/// principal's resolved role code (structured binding or legacy string form);
/// a missing principal or unresolvable role denies. Duplicates and ordering
/// in the list carry no meaning.
pub fn require_role(allowed: &[RoleCode], principal: Option<&Principal>) -> AuthzResult<()> {
    if allowed.is_empty() {
        return Ok(());
    }

    let code = principal.and_then(|p| p.role().code_str());
    let Some(code) = code else {
        return Err(AuthzError::forbidden("role not permitted for this operation"));
    };

    if allowed.iter().any(|r| r.as_str() == code) {
        Ok(())
    } else {
        Err(AuthzError::forbidden("role not permitted for this operation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mentordesk_core::{RoleId, TenantId, UserId};
    use proptest::prelude::*;

    use crate::role::{RoleBinding, RoleRef};

    const ALL_CODES: [RoleCode; 5] = [
        RoleCode::GlobalAdmin,
        RoleCode::Consultant,
        RoleCode::Manager,
        RoleCode::Contributor,
        RoleCode::ReadOnly,
    ];

    fn principal_with(role: RoleRef) -> Principal {
        let tenant = if role.is_global() {
            None
        } else {
            Some(TenantId::new())
        };
        Principal::new(UserId::new(), role, tenant)
    }

    #[test]
    fn empty_allow_list_is_role_agnostic() {
        assert!(require_role(&[], None).is_ok());

        let p = principal_with(RoleRef::Code("READ_ONLY".to_string()));
        assert!(require_role(&[], Some(&p)).is_ok());
    }

    #[test]
    fn missing_principal_denied_when_list_nonempty() {
        assert!(require_role(&[RoleCode::Manager], None).is_err());
    }

    #[test]
    fn legacy_string_and_binding_behave_identically() {
        let allowed = [RoleCode::Manager, RoleCode::Consultant];

        let legacy = principal_with(RoleRef::Code("MANAGER".to_string()));
        let structured = principal_with(RoleRef::Binding(RoleBinding {
            id: RoleId::new(),
            code: RoleCode::Manager,
            level: 2,
        }));

        assert!(require_role(&allowed, Some(&legacy)).is_ok());
        assert!(require_role(&allowed, Some(&structured)).is_ok());
    }

    #[test]
    fn membership_is_case_sensitive() {
        let p = principal_with(RoleRef::Code("manager".to_string()));
        assert!(require_role(&[RoleCode::Manager], Some(&p)).is_err());
    }

    #[test]
    fn empty_role_string_denied() {
        let p = principal_with(RoleRef::Code(String::new()));
        assert!(require_role(&[RoleCode::ReadOnly], Some(&p)).is_err());
    }

    #[test]
    fn role_outside_list_denied() {
        let p = principal_with(RoleRef::Code("CONTRIBUTOR".to_string()));
        assert!(require_role(&[RoleCode::Manager, RoleCode::Consultant], Some(&p)).is_err());
    }

    #[test]
    fn duplicates_in_list_have_no_effect() {
        let p = principal_with(RoleRef::Code("MANAGER".to_string()));
        assert!(
            require_role(
                &[RoleCode::Manager, RoleCode::Manager, RoleCode::Manager],
                Some(&p)
            )
            .is_ok()
        );
    }

    proptest! {
        /// Allowed iff the list is empty or the resolved code is a member,
        /// for every subset of the fixed role set and every principal role.
        #[test]
        fn membership_semantics_hold(
            mask in 0u8..32,
            role_idx in 0usize..5,
            legacy in proptest::bool::ANY,
        ) {
            let allowed: Vec<RoleCode> = ALL_CODES
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, c)| *c)
                .collect();

            let code = ALL_CODES[role_idx];
            let role = if legacy {
                RoleRef::Code(code.as_str().to_string())
            } else {
                RoleRef::Binding(RoleBinding {
                    id: RoleId::new(),
                    code,
                    level: code.default_level(),
                })
            };
            let p = principal_with(role);

            let outcome = require_role(&allowed, Some(&p)).is_ok();
            let expected = allowed.is_empty() || allowed.contains(&code);
            prop_assert_eq!(outcome, expected);
        }
    }
}
