use axum::{Json, extract::Path, http::StatusCode};
use tracing::instrument;

use edgeguard_core::AuthError;

use crate::middleware::principal::{Principal, RequireProductRead};
use crate::modules::me::model::MeResponse;

#[instrument(skip_all, fields(subject = %principal.subject()))]
pub async fn get_me(principal: Principal) -> Json<MeResponse> {
    Json(MeResponse::from(&principal.0))
}

/// `204` if the caller holds `authority`, `403` otherwise.
#[instrument(skip(principal), fields(subject = %principal.subject()))]
pub async fn check_authority(
    principal: Principal,
    Path(authority): Path<String>,
) -> Result<StatusCode, AuthError> {
    if principal.has_authority(&authority) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AuthError::MissingAuthority(authority))
    }
}

/// The caller's `product:*` authorities. Requires `product:read`.
#[instrument(skip_all, fields(subject = %access.0.subject()))]
pub async fn get_product_access(access: RequireProductRead) -> Json<MeResponse> {
    Json(MeResponse::product_scoped(&(access.0).0))
}
