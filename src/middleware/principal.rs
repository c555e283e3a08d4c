use axum::{extract::FromRequestParts, http::request::Parts};

use edgeguard_core::{AuthError, AuthenticatedIdentity, permissions};

/// Extractor for the identity installed by the internal trust stage.
///
/// Rejects with `403 Access denied. Authentication required` when the
/// request carries no identity (direct internal calls, or tokens without
/// authorities).
#[derive(Debug, Clone)]
pub struct Principal(pub AuthenticatedIdentity);

impl Principal {
    pub fn subject(&self) -> &str {
        self.0.subject()
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.0.has_authority(authority)
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Principal)
            .ok_or(AuthError::AuthenticationRequired)
    }
}

/// Declares an extractor that requires one authority on top of
/// [`Principal`].
#[macro_export]
macro_rules! require_authority {
    ($name:ident, $authority:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::principal::Principal);

        impl<S> axum::extract::FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = $crate::edgeguard_core::AuthError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let principal = <$crate::middleware::principal::Principal as axum::extract::FromRequestParts<
                    S,
                >>::from_request_parts(parts, state)
                .await?;

                if !principal.has_authority($authority) {
                    return Err($crate::edgeguard_core::AuthError::MissingAuthority(
                        $authority.to_string(),
                    ));
                }

                Ok($name(principal))
            }
        }
    };
}

require_authority!(RequireProductCreate, permissions::PRODUCT_CREATE);
require_authority!(RequireProductRead, permissions::PRODUCT_READ);
require_authority!(RequireProductUpdate, permissions::PRODUCT_UPDATE);
require_authority!(RequireProductDelete, permissions::PRODUCT_DELETE);
