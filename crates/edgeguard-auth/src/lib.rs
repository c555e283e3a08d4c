//! Bearer-token validation for edgeguard.
//!
//! - [`SigningKey`]: the shared HMAC key, decoded from configuration
//! - [`Claims`]: the token payload (`sub`, `exp`, `authorities`)
//! - [`TokenValidator`]: signature, algorithm, and expiry checks
//!
//! With the `test-utils` feature, [`sign_claims`] issues tokens under a key
//! so integration tests can drive the gateway end to end.

pub mod claims;
pub mod error;
pub mod jwt;
pub mod key;

pub use claims::Claims;
pub use error::TokenError;
pub use jwt::TokenValidator;
pub use key::{KeyError, MIN_KEY_BYTES, SigningKey};

#[cfg(any(test, feature = "test-utils"))]
pub use jsonwebtoken::Algorithm;
#[cfg(any(test, feature = "test-utils"))]
pub use jwt::{sign_claims, sign_claims_with};
