//! Role model: the fixed role hierarchy and the forms a role can arrive in.
//!
//! The platform deliberately uses a small, auditable set of roles with an
//! integer rank instead of a general policy engine. Lower level = more
//! privilege; the global role sits at the bottom of the ladder and is the only
//! role exempt from tenant binding.

use serde::{Deserialize, Serialize};

use mentordesk_core::RoleId;

/// Canonical role codes.
///
/// Exactly one role is bound to a user at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCode {
    /// Cross-tenant administrator. Never bound to a tenant.
    GlobalAdmin,
    Consultant,
    Manager,
    Contributor,
    ReadOnly,
}

impl RoleCode {
    /// Canonical wire string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCode::GlobalAdmin => "GLOBAL_ADMIN",
            RoleCode::Consultant => "CONSULTANT",
            RoleCode::Manager => "MANAGER",
            RoleCode::Contributor => "CONTRIBUTOR",
            RoleCode::ReadOnly => "READ_ONLY",
        }
    }

    /// Parse a canonical wire string (exact, case-sensitive).
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "GLOBAL_ADMIN" => Some(RoleCode::GlobalAdmin),
            "CONSULTANT" => Some(RoleCode::Consultant),
            "MANAGER" => Some(RoleCode::Manager),
            "CONTRIBUTOR" => Some(RoleCode::Contributor),
            "READ_ONLY" => Some(RoleCode::ReadOnly),
            _ => None,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, RoleCode::GlobalAdmin)
    }

    /// Default privilege rank for this code (lower = more powerful).
    pub fn default_level(&self) -> u8 {
        match self {
            RoleCode::GlobalAdmin => 0,
            RoleCode::Consultant => 1,
            RoleCode::Manager => 2,
            RoleCode::Contributor => 3,
            RoleCode::ReadOnly => 4,
        }
    }
}

impl core::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved role: identity, code, and privilege rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub id: RoleId,
    pub code: RoleCode,
    /// Privilege rank. Lower number = higher privilege; the global role has
    /// the strictly lowest level.
    pub level: u8,
}

/// A role as it arrives on a token or a stored user.
///
/// Older tokens carry a bare code string; newer ones carry the structured
/// binding. Both must be accepted identically, so this union is resolved
/// exactly once at the gate boundary and downstream logic never re-inspects
/// the original shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Binding(RoleBinding),
    Code(String),
}

impl RoleRef {
    /// Resolve to the canonical code string, if one exists.
    ///
    /// A legacy string is used verbatim (the role gate matches it exactly,
    /// case-sensitively); an empty string resolves to nothing.
    pub fn code_str(&self) -> Option<&str> {
        match self {
            RoleRef::Binding(b) => Some(b.code.as_str()),
            RoleRef::Code(s) if s.is_empty() => None,
            RoleRef::Code(s) => Some(s),
        }
    }

    /// Resolve to a known [`RoleCode`], if the reference names one.
    pub fn code(&self) -> Option<RoleCode> {
        match self {
            RoleRef::Binding(b) => Some(b.code),
            RoleRef::Code(s) => RoleCode::from_code(s),
        }
    }

    /// Privilege level, available only for the structured form.
    pub fn level(&self) -> Option<u8> {
        match self {
            RoleRef::Binding(b) => Some(b.level),
            RoleRef::Code(_) => None,
        }
    }

    pub fn is_global(&self) -> bool {
        self.code().is_some_and(|c| c.is_global())
    }
}

impl From<RoleBinding> for RoleRef {
    fn from(value: RoleBinding) -> Self {
        RoleRef::Binding(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trips_through_wire_string() {
        for code in [
            RoleCode::GlobalAdmin,
            RoleCode::Consultant,
            RoleCode::Manager,
            RoleCode::Contributor,
            RoleCode::ReadOnly,
        ] {
            assert_eq!(RoleCode::from_code(code.as_str()), Some(code));
        }
    }

    #[test]
    fn code_parse_is_case_sensitive() {
        assert_eq!(RoleCode::from_code("manager"), None);
        assert_eq!(RoleCode::from_code("Manager"), None);
        assert_eq!(RoleCode::from_code("MANAGER"), Some(RoleCode::Manager));
    }

    #[test]
    fn global_admin_has_lowest_level() {
        let global = RoleCode::GlobalAdmin.default_level();
        for code in [
            RoleCode::Consultant,
            RoleCode::Manager,
            RoleCode::Contributor,
            RoleCode::ReadOnly,
        ] {
            assert!(global < code.default_level());
        }
    }

    #[test]
    fn role_ref_resolves_both_forms_identically() {
        let binding = RoleRef::Binding(RoleBinding {
            id: RoleId::new(),
            code: RoleCode::Manager,
            level: 2,
        });
        let legacy = RoleRef::Code("MANAGER".to_string());

        assert_eq!(binding.code_str(), legacy.code_str());
        assert_eq!(binding.code(), legacy.code());
    }

    #[test]
    fn empty_legacy_string_resolves_to_nothing() {
        let role = RoleRef::Code(String::new());
        assert_eq!(role.code_str(), None);
        assert_eq!(role.code(), None);
        assert!(!role.is_global());
    }

    #[test]
    fn unknown_legacy_string_is_not_global() {
        let role = RoleRef::Code("SUPERUSER".to_string());
        assert_eq!(role.code(), None);
        assert_eq!(role.code_str(), Some("SUPERUSER"));
        assert!(!role.is_global());
    }

    #[test]
    fn untagged_serde_accepts_string_and_object() {
        let legacy: RoleRef = serde_json::from_str("\"CONSULTANT\"").unwrap();
        assert_eq!(legacy.code(), Some(RoleCode::Consultant));

        let structured: RoleRef = serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::nil(),
            "code": "CONSULTANT",
            "level": 1,
        }))
        .unwrap();
        assert_eq!(structured.code(), Some(RoleCode::Consultant));
        assert_eq!(structured.level(), Some(1));
    }
}
