//! Trust check in front of every internal service.
//!
//! A request is only served if it carries the gateway's shared secret. The
//! caller's identity is then taken from, in order of preference:
//!
//! - the Bearer token, re-validated with the service's own key
//! - the `X-Auth-User` / `X-Auth-Authorities` headers asserted by the
//!   gateway, when the token is correctly signed but expired in transit
//!
//! A call with the secret but no Bearer token is a direct service-to-service
//! call and gets no identity. Neither does a call whose token fails
//! re-validation for any other reason, since the gateway never forwards
//! such a token. Handlers that need an identity reject these through the
//! [`Principal`](crate::middleware::principal::Principal) extractor.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use edgeguard_auth::{TokenError, TokenValidator};
use edgeguard_core::headers::{X_AUTH_AUTHORITIES, X_AUTH_USER, X_INTERNAL_SECRET};
use edgeguard_core::{AuthError, AuthenticatedIdentity, SharedSecret, parse_authorities};

use crate::metrics::{track_identity_source, track_internal_rejection};
use crate::middleware::edge_auth::bearer_token;
use crate::state::ServiceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Token,
    PropagatedHeaders,
    DirectCall,
    InvalidToken,
}

impl IdentitySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentitySource::Token => "token",
            IdentitySource::PropagatedHeaders => "propagated_headers",
            IdentitySource::DirectCall => "direct_call",
            IdentitySource::InvalidToken => "invalid_token",
        }
    }
}

/// `X-Internal-Secret` must be present and byte-for-byte equal to the
/// configured secret.
pub fn check_internal_secret(secret: &SharedSecret, headers: &HeaderMap) -> Result<(), AuthError> {
    match headers.get(X_INTERNAL_SECRET) {
        Some(presented) if secret.matches(presented.as_bytes()) => Ok(()),
        _ => Err(AuthError::InternalAccessDenied),
    }
}

pub fn resolve_identity(
    validator: &TokenValidator,
    headers: &HeaderMap,
) -> (IdentitySource, Option<AuthenticatedIdentity>) {
    let Some(token) = headers.get(AUTHORIZATION).and_then(bearer_token) else {
        debug!(
            caller = header_str(headers, &X_AUTH_USER).unwrap_or("-"),
            "Direct internal call, no identity installed"
        );
        return (IdentitySource::DirectCall, None);
    };

    match identity_from_token(validator, token) {
        Ok(identity) => (IdentitySource::Token, identity),
        Err(err @ TokenError::Expired { .. }) => {
            warn!(
                kind = err.kind(),
                "Token expired after the gateway accepted it, using gateway identity headers"
            );
            (
                IdentitySource::PropagatedHeaders,
                identity_from_headers(headers),
            )
        }
        Err(err) => {
            warn!(
                kind = err.kind(),
                "Token failed re-validation, no identity installed"
            );
            (IdentitySource::InvalidToken, None)
        }
    }
}

fn identity_from_token(
    validator: &TokenValidator,
    token: &str,
) -> Result<Option<AuthenticatedIdentity>, TokenError> {
    let claims = validator.check(token)?;
    let subject = claims.sub.ok_or(TokenError::MissingClaim("sub"))?;
    let authorities = claims
        .authorities
        .as_deref()
        .map(parse_authorities)
        .unwrap_or_default();

    Ok(AuthenticatedIdentity::new(subject, authorities))
}

fn identity_from_headers(headers: &HeaderMap) -> Option<AuthenticatedIdentity> {
    let subject = header_str(headers, &X_AUTH_USER)?;
    let authorities = header_str(headers, &X_AUTH_AUTHORITIES)
        .map(parse_authorities)
        .unwrap_or_default();

    AuthenticatedIdentity::new(subject, authorities)
}

/// UTF-8 view of a header value. The gateway injects claims as raw UTF-8,
/// which `HeaderValue::to_str` would reject.
fn header_str<'a>(headers: &'a HeaderMap, name: &axum::http::HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
}

pub async fn internal_access(
    State(state): State<ServiceState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    if let Err(err) = check_internal_secret(&state.internal_secret, &parts.headers) {
        warn!(
            method = %parts.method,
            path = %parts.uri.path(),
            "Request did not come through the gateway"
        );
        track_internal_rejection();
        return err.into_response();
    }

    let (source, identity) = resolve_identity(&state.validator, &parts.headers);
    track_identity_source(source.as_str());

    match identity {
        Some(identity) => {
            debug!(
                subject = identity.subject(),
                source = source.as_str(),
                "Identity installed"
            );
            parts.extensions.insert(identity);
        }
        None => debug!(source = source.as_str(), "Proceeding without identity"),
    }

    next.run(Request::from_parts(parts, body)).await
}
