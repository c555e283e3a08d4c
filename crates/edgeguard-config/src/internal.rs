use std::fmt;

use crate::{ConfigError, env_lookup};

pub const INTERNAL_SHARED_SECRET_ENV: &str = "INTERNAL_SHARED_SECRET";

/// The gateway-to-service shared secret.
#[derive(Clone)]
pub struct InternalConfig {
    pub shared_secret: String,
}

impl InternalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let shared_secret = lookup(INTERNAL_SHARED_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(INTERNAL_SHARED_SECRET_ENV))?;

        Ok(Self { shared_secret })
    }
}

impl fmt::Debug for InternalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalConfig")
            .field("shared_secret", &"<redacted>")
            .finish()
    }
}
