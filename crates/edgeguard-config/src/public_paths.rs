use crate::env_lookup;

pub const PUBLIC_PATHS_ENV: &str = "PUBLIC_PATHS";
pub const PUBLIC_READ_PREFIX_ENV: &str = "PUBLIC_READ_PREFIX";

const DEFAULT_PUBLIC_PATHS: &str = "/api/account/login,/api/account/register";
const DEFAULT_PUBLIC_READ_PREFIX: &str = "/api/product/v1/products";

/// Paths the gateway forwards without looking at credentials.
///
/// Two rules, checked before any token logic:
///
/// - an exact match against `exact`
/// - a `GET` whose path starts with `read_prefix` (plain string prefix, so
///   `/api/product/v1/products/42` matches)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicPaths {
    pub exact: Vec<String>,
    pub read_prefix: Option<String>,
}

impl PublicPaths {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let exact = lookup(PUBLIC_PATHS_ENV)
            .unwrap_or_else(|| DEFAULT_PUBLIC_PATHS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let read_prefix = lookup(PUBLIC_READ_PREFIX_ENV)
            .unwrap_or_else(|| DEFAULT_PUBLIC_READ_PREFIX.to_string())
            .trim()
            .to_string();

        Self {
            exact,
            read_prefix: (!read_prefix.is_empty()).then_some(read_prefix),
        }
    }

    /// Whether a request with this method and path skips authentication.
    pub fn is_public(&self, method: &str, path: &str) -> bool {
        if self.exact.iter().any(|p| p == path) {
            return true;
        }

        match &self.read_prefix {
            Some(prefix) => method.eq_ignore_ascii_case("GET") && path.starts_with(prefix.as_str()),
            None => false,
        }
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
