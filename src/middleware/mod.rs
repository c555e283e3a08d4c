//! Request-processing stages and extractors.
//!
//! - [`edge_auth`]: token check and identity-header injection at the gateway
//! - [`internal_access`]: shared-secret check and identity resolution in
//!   front of internal services
//! - [`principal`]: extractors handlers use to read the resolved identity
//!
//! # Flow
//!
//! 1. The client calls the gateway with `Authorization: Bearer <token>`
//! 2. `edge_authorization` validates it and adds `X-Auth-User` and
//!    `X-Auth-Authorities`
//! 3. The proxy forwards the request with `X-Internal-Secret`
//! 4. `internal_access` checks the secret and installs an
//!    `AuthenticatedIdentity` in the request extensions
//! 5. Handlers take `Principal` or a `RequireProduct*` extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::principal::{Principal, RequireProductCreate};
//!
//! async fn whoami(Principal(identity): Principal) -> impl IntoResponse {
//!     identity.subject().to_string()
//! }
//!
//! async fn create_product(RequireProductCreate(principal): RequireProductCreate) {
//!     // Only runs if the caller holds "product:create"
//! }
//! ```

pub mod edge_auth;
pub mod internal_access;
pub mod principal;
