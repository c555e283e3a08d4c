//! Rejection taxonomy and JSON error bodies shared by the gateway and the
//! internal services.
//!
//! Two body shapes exist on the wire:
//!
//! - Edge rejections ([`EdgeRejection`]): `{"error": "<message>", "status": <code>}`
//! - Service rejections ([`AuthError`], [`AppError`]): `{"error": "<message>"}`
//!
//! Consumers may already parse the `status` field coming from the gateway,
//! so the two shapes are kept distinct.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Authentication and trust failures.
///
/// The status split is part of the protocol: a missing or malformed
/// credential is `401`, a credential that was presented but is invalid or
/// expired is `403`, and a failure to process claims that already passed
/// validation is `500`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header missing")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid or expired JWT token")]
    InvalidToken,

    #[error("Error processing JWT")]
    ClaimProcessing,

    #[error(
        "Access denied. Request did not originate from Gateway or provided wrong internal key."
    )]
    InternalAccessDenied,

    #[error("Access denied. Authentication required")]
    AuthenticationRequired,

    #[error("Access denied. Missing required authority: {0}")]
    MissingAuthority(String),
}

impl AuthError {
    /// HTTP status for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InvalidToken
            | AuthError::InternalAccessDenied
            | AuthError::AuthenticationRequired
            | AuthError::MissingAuthority(_) => StatusCode::FORBIDDEN,
            AuthError::ClaimProcessing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code, used as a log field and metrics label.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ClaimProcessing => "claim_processing",
            AuthError::InternalAccessDenied => "internal_access_denied",
            AuthError::AuthenticationRequired => "authentication_required",
            AuthError::MissingAuthority(_) => "missing_authority",
        }
    }

    /// Wraps the error so it renders with the gateway body shape.
    pub fn at_edge(self) -> EdgeRejection {
        EdgeRejection(self)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// An [`AuthError`] rendered by the gateway, with the numeric status echoed
/// in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRejection(pub AuthError);

impl IntoResponse for EdgeRejection {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let body = Json(json!({
            "error": self.0.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// General-purpose HTTP error for everything that is not an authentication
/// decision (routing, upstream failures, oversized bodies).
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn payload_too_large<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, err)
    }

    pub fn bad_gateway<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_GATEWAY, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}
