//! Wire-level header names shared by the gateway and internal services.
//!
//! Header names are case-insensitive on the wire; `HeaderName` stores them
//! lowercased.

use axum::http::HeaderName;

/// Subject asserted by the gateway after it validated the bearer token.
pub const X_AUTH_USER: HeaderName = HeaderName::from_static("x-auth-user");

/// Comma-joined authorities asserted by the gateway, copied verbatim from
/// the token's `authorities` claim.
pub const X_AUTH_AUTHORITIES: HeaderName = HeaderName::from_static("x-auth-authorities");

/// Static shared secret proving a request came through the gateway.
pub const X_INTERNAL_SECRET: HeaderName = HeaderName::from_static("x-internal-secret");

/// Prefix of an `Authorization` value carrying a bearer token. Matched
/// case-sensitively, including the trailing space.
pub const BEARER_PREFIX: &str = "Bearer ";
