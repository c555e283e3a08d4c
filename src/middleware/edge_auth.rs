//! Authorization at the gateway.
//!
//! Every request through the gateway goes through [`edge_authorization`]
//! before it is forwarded:
//!
//! 1. client-supplied `X-Auth-User` / `X-Auth-Authorities` are dropped
//! 2. public paths are forwarded as they are
//! 3. otherwise a valid `Bearer` token is required, and its subject and
//!    authorities are injected as `X-Auth-*` headers for the services
//!
//! The decision itself is the pure function [`authorize`].

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{debug, error, warn};

use edgeguard_auth::{TokenError, TokenValidator};
use edgeguard_config::PublicPaths;
use edgeguard_core::AuthError;
use edgeguard_core::headers::{BEARER_PREFIX, X_AUTH_AUTHORITIES, X_AUTH_USER};

use crate::metrics::track_edge_decision;
use crate::state::GatewayState;

/// What the gateway does with a request that passed authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Public path; forward unchanged.
    Bypass,
    /// Forward with identity headers attached.
    Authenticated {
        subject: HeaderValue,
        authorities: HeaderValue,
    },
}

/// The token in an `Authorization: Bearer <token>` value.
///
/// `None` when the value is not visible ASCII or lacks the exact,
/// case-sensitive `Bearer ` prefix.
pub fn bearer_token(value: &HeaderValue) -> Option<&str> {
    value.to_str().ok()?.strip_prefix(BEARER_PREFIX)
}

pub fn authorize(
    validator: &TokenValidator,
    public_paths: &PublicPaths,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Result<EdgeDecision, AuthError> {
    authorize_at(
        validator,
        public_paths,
        method,
        path,
        headers,
        Utc::now().timestamp(),
    )
}

/// [`authorize`] with every token check pinned to the same instant.
pub fn authorize_at(
    validator: &TokenValidator,
    public_paths: &PublicPaths,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    now: i64,
) -> Result<EdgeDecision, AuthError> {
    if public_paths.is_public(method.as_str(), path) {
        return Ok(EdgeDecision::Bypass);
    }

    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?;
    let token = bearer_token(header).ok_or(AuthError::InvalidAuthHeader)?;

    if !validator.validate_at(token, now) {
        return Err(AuthError::InvalidToken);
    }

    let subject = validator
        .extract_subject_at(token, now)
        .map_err(claim_error)?;
    let authorities = validator
        .extract_authorities_at(token, now)
        .map_err(claim_error)?
        .unwrap_or_default();

    Ok(EdgeDecision::Authenticated {
        subject: header_value(&subject)?,
        authorities: header_value(&authorities)?,
    })
}

fn claim_error(err: TokenError) -> AuthError {
    error!(kind = err.kind(), error = %err, "Failed to extract claims from a validated JWT");
    AuthError::ClaimProcessing
}

fn header_value(claim: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(claim).map_err(|_| {
        error!("JWT claim cannot be carried in a header");
        AuthError::ClaimProcessing
    })
}

pub async fn edge_authorization(
    State(state): State<GatewayState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    // Identity headers are only ever asserted by this stage.
    parts.headers.remove(X_AUTH_USER);
    parts.headers.remove(X_AUTH_AUTHORITIES);

    let decision = authorize(
        &state.validator,
        &state.public_paths,
        &parts.method,
        parts.uri.path(),
        &parts.headers,
    );

    match decision {
        Ok(EdgeDecision::Bypass) => {
            debug!(method = %parts.method, path = %parts.uri.path(), "Public path, skipping authentication");
            track_edge_decision("bypass");
        }
        Ok(EdgeDecision::Authenticated {
            subject,
            authorities,
        }) => {
            debug!(
                method = %parts.method,
                path = %parts.uri.path(),
                subject = ?subject,
                "Request authenticated"
            );
            parts.headers.insert(X_AUTH_USER, subject);
            parts.headers.insert(X_AUTH_AUTHORITIES, authorities);
            track_edge_decision("authenticated");
        }
        Err(err) => {
            if err.status_code().is_server_error() {
                error!(method = %parts.method, path = %parts.uri.path(), code = err.error_code(), "Rejected at gateway");
            } else {
                warn!(method = %parts.method, path = %parts.uri.path(), code = err.error_code(), "Rejected at gateway");
            }
            track_edge_decision(err.error_code());
            return err.at_edge().into_response();
        }
    }

    next.run(Request::from_parts(parts, body)).await
}
