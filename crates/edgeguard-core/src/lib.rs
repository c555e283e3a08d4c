//! # Edgeguard Core
//!
//! Core types shared by the gateway and the internal services:
//!
//! - [`errors`]: Rejection taxonomy and JSON error bodies
//! - [`identity`]: The authenticated principal and authority parsing
//! - [`headers`]: Wire header names of the trust protocol
//! - [`secret`]: The internal shared secret and log-safe fingerprints
//! - [`permissions`]: Authority constants
//!
//! # Example
//!
//! ```ignore
//! use edgeguard_core::{AuthError, AuthenticatedIdentity, parse_authorities};
//!
//! let authorities = parse_authorities("product:read,product:create");
//! let identity = AuthenticatedIdentity::new("alice", authorities)
//!     .ok_or(AuthError::AuthenticationRequired)?;
//! ```

pub mod errors;
pub mod headers;
pub mod identity;
pub mod permissions;
pub mod secret;

// Re-export commonly used types at crate root
pub use errors::{AppError, AuthError, EdgeRejection};
pub use identity::{AuthenticatedIdentity, parse_authorities};
pub use secret::{SharedSecret, fingerprint};
