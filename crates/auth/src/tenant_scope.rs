//! Tenant-Scope Gate.
//!
//! Runs once per request, strictly after authentication and before the
//! handler. A non-global principal may only touch its own tenant; the global
//! role bypasses tenant scoping entirely.
//!
//! Only a field explicitly named as the tenant identifier is ever consulted.
//! A route's generic `id` segment belongs to some other entity and must never
//! be treated as a tenant identifier; extraction callers uphold that by
//! passing only explicitly tenant-named fields here.

use core::str::FromStr;

use mentordesk_core::TenantId;

use crate::error::{AuthzError, AuthzResult};
use crate::principal::Principal;

/// Pick the candidate tenant identifier from the explicit request channels.
///
/// Priority order: route parameter, then query parameter, then body field.
/// The first present source is authoritative; later sources are ignored, not
/// merged. All-absent means the request is not tenant-scoped by its shape.
pub fn requested_tenant<'a>(
    path: Option<&'a str>,
    query: Option<&'a str>,
    body: Option<&'a str>,
) -> Option<&'a str> {
    path.or(query).or(body)
}

/// Decide whether the principal may proceed against the requested tenant.
///
/// Malformed identifiers are treated as probes and denied outright rather
/// than gracefully ignored.
pub fn enforce_tenant_scope(principal: &Principal, requested: Option<&str>) -> AuthzResult<()> {
    if principal.is_global() {
        return Ok(());
    }

    let Some(raw) = requested else {
        // Not tenant-scoped by its own request shape; any remaining tenant
        // scoping is the called service's responsibility.
        return Ok(());
    };

    let tenant = parse_canonical_tenant(raw)
        .ok_or_else(|| AuthzError::forbidden("invalid tenant identifier"))?;

    if principal.tenant_id() != Some(tenant) {
        return Err(AuthzError::forbidden("cross-tenant access denied"));
    }

    Ok(())
}

/// Parse a tenant identifier in canonical 8-4-4-4-12 hyphenated form
/// (case-insensitive hex).
///
/// `Uuid::parse_str` also accepts simple/braced/urn forms; those are not
/// canonical and are rejected here.
fn parse_canonical_tenant(s: &str) -> Option<TenantId> {
    if !is_canonical_uuid(s) {
        return None;
    }
    TenantId::from_str(s).ok()
}

fn is_canonical_uuid(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        8 | 13 | 18 | 23 => *b == b'-',
        _ => b.is_ascii_hexdigit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use mentordesk_core::UserId;

    use crate::role::{RoleCode, RoleRef};

    fn tenant_principal(tenant_id: TenantId) -> Principal {
        Principal::new(
            UserId::new(),
            RoleRef::Code(RoleCode::Manager.as_str().to_string()),
            Some(tenant_id),
        )
    }

    fn global_principal() -> Principal {
        Principal::new(
            UserId::new(),
            RoleRef::Code(RoleCode::GlobalAdmin.as_str().to_string()),
            None,
        )
    }

    #[test]
    fn priority_is_path_then_query_then_body() {
        assert_eq!(requested_tenant(Some("p"), Some("q"), Some("b")), Some("p"));
        assert_eq!(requested_tenant(None, Some("q"), Some("b")), Some("q"));
        assert_eq!(requested_tenant(None, None, Some("b")), Some("b"));
        assert_eq!(requested_tenant(None, None, None), None);
    }

    #[test]
    fn global_principal_bypasses_tenant_scoping() {
        let principal = global_principal();
        let other = TenantId::new().to_string();

        assert!(enforce_tenant_scope(&principal, Some(&other)).is_ok());
        assert!(enforce_tenant_scope(&principal, Some("not-a-uuid")).is_ok());
        assert!(enforce_tenant_scope(&principal, None).is_ok());
    }

    #[test]
    fn own_tenant_allowed() {
        let tenant = TenantId::new();
        let principal = tenant_principal(tenant);

        assert!(enforce_tenant_scope(&principal, Some(&tenant.to_string())).is_ok());
    }

    #[test]
    fn own_tenant_allowed_uppercase_hex() {
        let tenant = TenantId::new();
        let principal = tenant_principal(tenant);
        let upper = tenant.to_string().to_uppercase();

        assert!(enforce_tenant_scope(&principal, Some(&upper)).is_ok());
    }

    #[test]
    fn cross_tenant_denied() {
        let principal = tenant_principal(TenantId::new());
        let other = TenantId::new().to_string();

        assert_eq!(
            enforce_tenant_scope(&principal, Some(&other)),
            Err(AuthzError::forbidden("cross-tenant access denied"))
        );
    }

    #[test]
    fn malformed_identifier_denied_even_if_prefix_matches() {
        let tenant = TenantId::new();
        let principal = tenant_principal(tenant);

        for bad in [
            "not-a-uuid",
            "",
            // simple form (no hyphens) is not canonical
            &tenant.to_string().replace('-', ""),
            // braced form is not canonical
            &format!("{{{tenant}}}"),
            &format!("urn:uuid:{tenant}"),
        ] {
            assert_eq!(
                enforce_tenant_scope(&principal, Some(bad)),
                Err(AuthzError::forbidden("invalid tenant identifier")),
                "expected denial for {bad:?}"
            );
        }
    }

    #[test]
    fn absent_candidate_allowed() {
        let principal = tenant_principal(TenantId::new());
        assert!(enforce_tenant_scope(&principal, None).is_ok());
    }
}
