use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::edge_auth::edge_authorization;
use crate::middleware::internal_access::internal_access;
use crate::modules::health::health;
use crate::modules::me::init_me_router;
use crate::modules::proxy::init_proxy_router;
use crate::state::{GatewayState, ServiceState};

/// The gateway: every path except `/health` is authorized, then forwarded.
pub fn init_gateway_router(state: GatewayState) -> Router {
    init_proxy_router()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            edge_authorization,
        ))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// An internal service: everything under `/api/v1` requires the gateway's
/// shared secret.
pub fn init_service_router(state: ServiceState) -> Router {
    Router::new()
        .nest("/api/v1/me", init_me_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            internal_access,
        ))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
