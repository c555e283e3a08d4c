use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Payload of an access token issued by the account service.
///
/// Only `exp` is mandatory at decode time. A token without `sub` still
/// verifies; asking it for a subject is what fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Comma-separated authority list, e.g. `product:read,product:create`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorities: Option<String>,
}

impl Claims {
    pub fn new(subject: impl Into<String>, authorities: Option<&str>, exp: i64) -> Self {
        Self {
            sub: Some(subject.into()),
            exp,
            iat: Some(Utc::now().timestamp()),
            authorities: authorities.map(str::to_string),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Expired strictly after `exp`; a token is still good during its
    /// expiry second.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp < now
    }
}
