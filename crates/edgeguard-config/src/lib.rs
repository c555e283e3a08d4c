//! # Edgeguard Config
//!
//! Configuration types for the gateway and the internal services, loaded
//! from environment variables:
//!
//! - [`jwt`]: Signing-key material for token validation
//! - [`internal`]: The gateway-to-service shared secret
//! - [`public_paths`]: Paths that bypass authentication at the gateway
//! - [`gateway`]: Upstream routing for the gateway
//!
//! Every config type has a `from_env()` constructor and a `from_lookup()`
//! constructor taking any `Fn(&str) -> Option<String>`, which tests use
//! instead of mutating the process environment.
//!
//! # Example
//!
//! ```ignore
//! use edgeguard_config::{GatewayConfig, InternalConfig, JwtConfig, PublicPaths};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let internal_config = InternalConfig::from_env()?;
//! let public_paths = PublicPaths::from_env();
//! let gateway_config = GatewayConfig::from_env()?;
//! ```

pub mod gateway;
pub mod internal;
pub mod jwt;
pub mod public_paths;

// Re-export commonly used types at crate root
pub use gateway::{GatewayConfig, UpstreamRoute};
pub use internal::InternalConfig;
pub use jwt::JwtConfig;
pub use public_paths::PublicPaths;

/// Errors raised while loading configuration. Any of these aborts startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
