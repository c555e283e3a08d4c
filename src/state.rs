use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use reqwest::redirect::Policy;
use tracing::info;

use edgeguard_auth::{SigningKey, TokenValidator};
use edgeguard_config::{GatewayConfig, InternalConfig, JwtConfig, PublicPaths};
use edgeguard_core::SharedSecret;

/// Shared state of the gateway binary.
#[derive(Clone)]
pub struct GatewayState {
    pub validator: Arc<TokenValidator>,
    pub public_paths: Arc<PublicPaths>,
    pub gateway: Arc<GatewayConfig>,
    /// `X-Internal-Secret` value attached to every forwarded request.
    pub internal_secret_header: HeaderValue,
    pub http: reqwest::Client,
}

impl GatewayState {
    pub fn from_config(
        jwt: &JwtConfig,
        internal: &InternalConfig,
        public_paths: PublicPaths,
        gateway: GatewayConfig,
    ) -> anyhow::Result<Self> {
        let validator = build_validator(jwt)?;
        let internal_secret = build_shared_secret(internal);

        let mut internal_secret_header = HeaderValue::from_str(internal_secret.expose())
            .context("INTERNAL_SHARED_SECRET is not a valid header value")?;
        internal_secret_header.set_sensitive(true);

        let http = reqwest::Client::builder()
            .timeout(gateway.upstream_timeout)
            .redirect(Policy::none())
            .build()
            .context("Failed to build upstream HTTP client")?;

        for route in &gateway.routes {
            info!(prefix = %route.prefix, target = %route.target, "Upstream route registered");
        }
        info!(
            exact = ?public_paths.exact,
            read_prefix = ?public_paths.read_prefix,
            "Public paths configured"
        );

        Ok(Self {
            validator,
            public_paths: Arc::new(public_paths),
            gateway: Arc::new(gateway),
            internal_secret_header,
            http,
        })
    }
}

/// Shared state of an internal service behind the gateway.
#[derive(Clone)]
pub struct ServiceState {
    pub validator: Arc<TokenValidator>,
    pub internal_secret: SharedSecret,
}

impl ServiceState {
    pub fn from_config(jwt: &JwtConfig, internal: &InternalConfig) -> anyhow::Result<Self> {
        Ok(Self {
            validator: build_validator(jwt)?,
            internal_secret: build_shared_secret(internal),
        })
    }
}

pub fn init_gateway_state() -> anyhow::Result<GatewayState> {
    let jwt = JwtConfig::from_env()?;
    let internal = InternalConfig::from_env()?;
    let gateway = GatewayConfig::from_env()?;

    GatewayState::from_config(&jwt, &internal, PublicPaths::from_env(), gateway)
}

pub fn init_service_state() -> anyhow::Result<ServiceState> {
    let jwt = JwtConfig::from_env()?;
    let internal = InternalConfig::from_env()?;

    ServiceState::from_config(&jwt, &internal)
}

fn build_validator(jwt: &JwtConfig) -> anyhow::Result<Arc<TokenValidator>> {
    let key = SigningKey::from_config(jwt).context("Invalid JWT_SECRET_KEY")?;
    info!(
        key_len = key.byte_len(),
        key_fingerprint = %key.fingerprint(),
        "JWT signing key loaded"
    );

    Ok(Arc::new(TokenValidator::new(key)))
}

fn build_shared_secret(internal: &InternalConfig) -> SharedSecret {
    let secret = SharedSecret::new(internal.shared_secret.as_str());
    info!(
        secret_len = secret.byte_len(),
        secret_fingerprint = %secret.fingerprint(),
        "Internal shared secret loaded"
    );
    secret
}
