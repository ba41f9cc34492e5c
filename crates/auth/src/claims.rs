//! Access-token claims model and the principal-resolution seam.
//!
//! Claims validation is deterministic and separated from signature
//! verification: [`validate_claims`] takes `now` explicitly, and the
//! [`TokenVerifier`] trait hides the concrete token mechanism from the rest
//! of the system.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use mentordesk_core::{TenantId, UserId};

use crate::principal::Principal;
use crate::role::RoleRef;

/// Verified access-token claims (transport-agnostic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject / principal identifier.
    pub sub: UserId,

    /// Role granted to the principal. Legacy tokens carry a bare code
    /// string; newer tokens carry the structured binding.
    pub role: RoleRef,

    /// Tenant context for the token. `None` only for the global role.
    pub tenant_id: Option<TenantId>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl AccessClaims {
    /// Build the request principal from these claims.
    pub fn into_principal(self) -> Principal {
        Principal::new(self.sub, self.role, self.tenant_id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("non-global role requires a tenant binding")]
    TenantRequired,

    #[error("global role cannot carry a tenant binding")]
    GlobalTenantBound,
}

/// Deterministically validate access claims.
///
/// Note: this validates the *claims* only. Signature verification/decoding
/// happens in the [`TokenVerifier`] implementation.
pub fn validate_claims(
    claims: &AccessClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }

    // Resolver contract: tenant_id is None exactly when the role is global.
    if claims.role.is_global() {
        if claims.tenant_id.is_some() {
            return Err(TokenValidationError::GlobalTenantBound);
        }
    } else if claims.tenant_id.is_none() {
        return Err(TokenValidationError::TenantRequired);
    }

    Ok(())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature/structure failure. Deliberately opaque.
    #[error("invalid token")]
    Invalid,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Principal-resolution seam: verify a credential and produce claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError>;
}

/// On-the-wire JWT claims shape (numeric timestamps per RFC 7519).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: Uuid,
    role: RoleRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tenant_id: Option<Uuid>,
    iat: i64,
    exp: i64,
}

/// HS256 JWT verifier.
pub struct Hs256TokenVerifier {
    key: DecodingKey,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
        }
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        // Temporal checks run in validate_claims against the caller's `now`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<WireClaims>(token, &self.key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let issued_at = Utc
            .timestamp_opt(data.claims.iat, 0)
            .single()
            .ok_or(TokenError::Invalid)?;
        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or(TokenError::Invalid)?;

        let claims = AccessClaims {
            sub: UserId::from_uuid(data.claims.sub),
            role: data.claims.role,
            tenant_id: data.claims.tenant_id.map(TenantId::from_uuid),
            issued_at,
            expires_at,
        };

        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::role::RoleCode;

    fn claims(role: RoleRef, tenant_id: Option<TenantId>) -> AccessClaims {
        let now = Utc::now();
        AccessClaims {
            sub: UserId::new(),
            role,
            tenant_id,
            issued_at: now - Duration::minutes(5),
            expires_at: now + Duration::minutes(55),
        }
    }

    #[test]
    fn valid_tenant_claims_pass() {
        let c = claims(
            RoleRef::Code("MANAGER".to_string()),
            Some(TenantId::new()),
        );
        assert!(validate_claims(&c, Utc::now()).is_ok());
    }

    #[test]
    fn expired_token_rejected() {
        let c = claims(
            RoleRef::Code("MANAGER".to_string()),
            Some(TenantId::new()),
        );
        let later = c.expires_at + Duration::seconds(1);
        assert_eq!(
            validate_claims(&c, later),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_token_rejected() {
        let c = claims(
            RoleRef::Code("MANAGER".to_string()),
            Some(TenantId::new()),
        );
        let before = c.issued_at - Duration::seconds(1);
        assert_eq!(
            validate_claims(&c, before),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn non_global_role_without_tenant_rejected() {
        let c = claims(RoleRef::Code("CONSULTANT".to_string()), None);
        assert_eq!(
            validate_claims(&c, Utc::now()),
            Err(TokenValidationError::TenantRequired)
        );
    }

    #[test]
    fn global_role_with_tenant_rejected() {
        let c = claims(
            RoleRef::Code(RoleCode::GlobalAdmin.as_str().to_string()),
            Some(TenantId::new()),
        );
        assert_eq!(
            validate_claims(&c, Utc::now()),
            Err(TokenValidationError::GlobalTenantBound)
        );
    }

    #[test]
    fn global_role_without_tenant_passes() {
        let c = claims(
            RoleRef::Code(RoleCode::GlobalAdmin.as_str().to_string()),
            None,
        );
        assert!(validate_claims(&c, Utc::now()).is_ok());
    }

    #[test]
    fn hs256_round_trip() {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let now = Utc::now();
        let wire = WireClaims {
            sub: Uuid::now_v7(),
            role: RoleRef::Code("MANAGER".to_string()),
            tenant_id: Some(Uuid::now_v7()),
            iat: now.timestamp() - 60,
            exp: now.timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &wire,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let verifier = Hs256TokenVerifier::new(b"test-secret");
        let claims = verifier.verify(&token, now).unwrap();
        assert_eq!(claims.sub.as_uuid(), &wire.sub);
        assert_eq!(claims.role.code(), Some(RoleCode::Manager));
    }

    #[test]
    fn hs256_wrong_secret_rejected() {
        use jsonwebtoken::{EncodingKey, Header, encode};

        let now = Utc::now();
        let wire = WireClaims {
            sub: Uuid::now_v7(),
            role: RoleRef::Code("MANAGER".to_string()),
            tenant_id: Some(Uuid::now_v7()),
            iat: now.timestamp() - 60,
            exp: now.timestamp() + 3600,
        };
        let token = encode(
            &Header::default(),
            &wire,
            &EncodingKey::from_secret(b"other-secret"),
        )
        .unwrap();

        let verifier = Hs256TokenVerifier::new(b"test-secret");
        assert_eq!(verifier.verify(&token, now), Err(TokenError::Invalid));
    }
}
