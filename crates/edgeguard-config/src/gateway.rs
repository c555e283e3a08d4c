use std::time::Duration;

use crate::{ConfigError, env_lookup};

pub const GATEWAY_ROUTES_ENV: &str = "GATEWAY_ROUTES";
pub const UPSTREAM_TIMEOUT_SECS_ENV: &str = "UPSTREAM_TIMEOUT_SECS";

const DEFAULT_ROUTES: &str =
    "/api/account=http://localhost:8081/api,/api/product=http://localhost:8082/api";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Maps a public path prefix to an upstream base URL.
///
/// `/api/product=http://product:8082/api` forwards
/// `/api/product/v1/products?page=2` to
/// `http://product:8082/api/v1/products?page=2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamRoute {
    pub prefix: String,
    pub target: String,
}

impl UpstreamRoute {
    /// Returns the part of `path` after the prefix, if the prefix matches on
    /// a segment boundary.
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') || self.prefix.ends_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub routes: Vec<UpstreamRoute>,
    pub upstream_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_routes = lookup(GATEWAY_ROUTES_ENV).unwrap_or_else(|| DEFAULT_ROUTES.to_string());
        let routes = parse_routes(&raw_routes)?;

        let upstream_timeout = match lookup(UPSTREAM_TIMEOUT_SECS_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::Invalid {
                    var: UPSTREAM_TIMEOUT_SECS_ENV,
                    reason: e.to_string(),
                })?,
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            routes,
            upstream_timeout,
        })
    }

    /// Longest-prefix route for `path`, together with the remainder to
    /// append to the route's target.
    pub fn route_for<'a>(&self, path: &'a str) -> Option<(&UpstreamRoute, &'a str)> {
        self.routes
            .iter()
            .filter_map(|route| route.remainder(path).map(|rest| (route, rest)))
            .max_by_key(|(route, _)| route.prefix.len())
    }
}

fn parse_routes(raw: &str) -> Result<Vec<UpstreamRoute>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (prefix, target) = entry.split_once('=').ok_or_else(|| ConfigError::Invalid {
                var: GATEWAY_ROUTES_ENV,
                reason: format!("expected <prefix>=<url>, got {entry:?}"),
            })?;

            let prefix = prefix.trim();
            let target = target.trim().trim_end_matches('/');

            if !prefix.starts_with('/') {
                return Err(ConfigError::Invalid {
                    var: GATEWAY_ROUTES_ENV,
                    reason: format!("route prefix {prefix:?} must start with '/'"),
                });
            }
            if !(target.starts_with("http://") || target.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: GATEWAY_ROUTES_ENV,
                    reason: format!("route target {target:?} must be an http(s) URL"),
                });
            }

            Ok(UpstreamRoute {
                prefix: prefix.to_string(),
                target: target.to_string(),
            })
        })
        .collect()
}
