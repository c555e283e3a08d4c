use std::fmt;

use crate::{ConfigError, env_lookup};

pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";

/// Raw signing-key configuration.
///
/// `secret_key` is the base64 value exactly as configured; decoding and
/// length checks happen when the signing key is built at startup.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret_key: String,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = lookup(JWT_SECRET_KEY_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_KEY_ENV))?;

        Ok(Self { secret_key })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
