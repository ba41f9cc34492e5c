//! Request-level gates: authentication, then tenant scoping.
//!
//! Both run before any handler body; the role gate composes separately at the
//! operation level. The principal travels via request extensions only within
//! this crate — every check in `mentordesk-auth` receives it as an explicit
//! argument.

use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    extract::{RawPathParams, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use mentordesk_auth::{
    AuthzError, Principal, TokenVerifier, enforce_tenant_scope, requested_tenant,
};

use crate::app::errors;

/// Largest request body the tenant sniffer will buffer.
const BODY_SNIFF_LIMIT: usize = 256 * 1024;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Authentication gate: bearer token → verified claims → [`Principal`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).map_err(errors::authz_error_to_response)?;

    let claims = state
        .verifier
        .verify(token, Utc::now())
        .map_err(|_| errors::authz_error_to_response(AuthzError::Unauthenticated))?;

    req.extensions_mut().insert(claims.into_principal());

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthzError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthzError::Unauthenticated)?;

    let header = header.to_str().map_err(|_| AuthzError::Unauthenticated)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(AuthzError::Unauthenticated)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(AuthzError::Unauthenticated);
    }

    Ok(token)
}

/// Tenant-Scope Gate: runs strictly after [`auth_middleware`].
///
/// Only fields explicitly named `tenant_id` are consulted, in priority order
/// route parameter → query parameter → top-level body field. A route's
/// generic `:id` segment identifies some other entity and is never a tenant
/// identifier.
pub async fn tenant_scope_middleware(
    path_params: Option<RawPathParams>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let Some(principal) = req.extensions().get::<Principal>().cloned() else {
        return Err(errors::authz_error_to_response(AuthzError::Unauthenticated));
    };

    let from_path = path_params.as_ref().and_then(|params| {
        params
            .iter()
            .find(|(name, _)| *name == "tenant_id")
            .map(|(_, value)| value.to_string())
    });

    let from_query = req.uri().query().and_then(query_tenant);

    // The body is buffered only when the decision can still depend on it:
    // global principals bypass the gate, and a higher-priority source is
    // authoritative on its own.
    let (req, from_body) = if !principal.is_global() && from_path.is_none() && from_query.is_none()
    {
        sniff_body_tenant(req).await?
    } else {
        (req, None)
    };

    let candidate = requested_tenant(
        from_path.as_deref(),
        from_query.as_deref(),
        from_body.as_deref(),
    );
    enforce_tenant_scope(&principal, candidate).map_err(errors::authz_error_to_response)?;

    Ok(next.run(req).await)
}

/// First `tenant_id` occurrence in the query string.
///
/// The pairs are scanned positionally, not deserialized into a keyed struct:
/// a duplicated `tenant_id` key or an undecodable query must still surface a
/// present tenant-named field to the gate, never read as "no tenant
/// requested".
fn query_tenant(query: &str) -> Option<String> {
    match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
        Ok(pairs) => pairs
            .into_iter()
            .find(|(key, _)| key == "tenant_id")
            .map(|(_, value)| value),
        Err(_) => query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == "tenant_id").then(|| value.to_string())
        }),
    }
}

/// Read a JSON body's top-level `tenant_id` string, handing the bytes back
/// untouched for the handler's own extractor.
async fn sniff_body_tenant(req: Request) -> Result<(Request, Option<String>), Response> {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if !is_json {
        return Ok((req, None));
    }

    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, BODY_SNIFF_LIMIT).await.map_err(|_| {
        errors::json_error(
            StatusCode::PAYLOAD_TOO_LARGE,
            "payload_too_large",
            "request body too large",
        )
    })?;

    let tenant = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| {
            v.get("tenant_id")
                .and_then(|t| t.as_str())
                .map(str::to_string)
        });

    Ok((Request::from_parts(parts, Body::from(bytes)), tenant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_tenant_takes_first_occurrence() {
        assert_eq!(
            query_tenant("tenant_id=a&tenant_id=b"),
            Some("a".to_string())
        );
        assert_eq!(query_tenant("other=1&tenant_id=a"), Some("a".to_string()));
        assert_eq!(query_tenant("tenant_id=a"), Some("a".to_string()));
    }

    #[test]
    fn query_tenant_absent_key_is_no_candidate() {
        assert_eq!(query_tenant("other=1"), None);
        assert_eq!(query_tenant(""), None);
    }

    #[test]
    fn query_tenant_surfaces_garbage_values_for_the_gate_to_deny() {
        // A tenant-named key always yields a candidate, even when the value
        // cannot possibly pass the canonical-format check downstream.
        assert_eq!(query_tenant("tenant_id="), Some(String::new()));
        assert_eq!(query_tenant("tenant_id=%zz"), Some("%zz".to_string()));
    }
}
