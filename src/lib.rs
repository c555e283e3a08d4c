//! # Edgeguard
//!
//! Two-tier trust for a set of HTTP services behind an API gateway.
//!
//! ## Overview
//!
//! - **Gateway** (`edgeguard-gateway`): validates `Bearer` tokens, injects
//!   the caller's identity as `X-Auth-User` / `X-Auth-Authorities`, and
//!   forwards to the upstream that owns the path with `X-Internal-Secret`
//! - **Internal service** (`edgeguard-service`): refuses anything without
//!   the shared secret, resolves the caller's identity, and exposes it to
//!   handlers through extractors
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── edgeguard-core/    # Error taxonomy, identity, header names, secrets
//! ├── edgeguard-config/  # Environment configuration
//! └── edgeguard-auth/    # Signing key and token validation
//! src/
//! ├── middleware/        # Edge and internal trust stages, extractors
//! ├── modules/
//! │   ├── proxy/         # Upstream forwarding
//! │   ├── me/            # Demo endpoints for the resolved identity
//! │   └── health/
//! └── bin/               # gateway and service binaries
//! ```
//!
//! ## Request flow
//!
//! ```text
//! client ──Bearer──▶ gateway ──X-Auth-*, X-Internal-Secret──▶ service
//!                     │                                        │
//!                     └ 401 / 403 / 500 {"error","status"}     └ 403 {"error"}
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET_KEY=<base64, at least 32 bytes decoded>
//! INTERNAL_SHARED_SECRET=<shared with every service>
//! PUBLIC_PATHS=/api/account/login,/api/account/register
//! PUBLIC_READ_PREFIX=/api/product/v1/products
//! GATEWAY_ROUTES=/api/account=http://localhost:8081/api,/api/product=http://localhost:8082/api
//! UPSTREAM_TIMEOUT_SECS=30
//! METRICS_ADDR=0.0.0.0:9100
//! LOG_FORMAT=json
//! ```
//!
//! ## Security Considerations
//!
//! - Signing keys, shared secrets, and tokens are only ever logged as
//!   fingerprints
//! - Client-supplied `X-Auth-*` headers are dropped at the gateway
//! - Internal services compare the shared secret byte for byte

pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use edgeguard_auth;
pub use edgeguard_config;
pub use edgeguard_core;

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
