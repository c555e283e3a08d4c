use axum::{Router, routing::any};

use crate::state::GatewayState;

use super::controller::forward;

pub fn init_proxy_router() -> Router<GatewayState> {
    Router::new().route("/{*path}", any(forward))
}
