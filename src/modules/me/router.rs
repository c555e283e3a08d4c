use axum::{Router, routing::get};

use crate::state::ServiceState;

use super::controller::{check_authority, get_me, get_product_access};

pub fn init_me_router() -> Router<ServiceState> {
    Router::new()
        .route("/", get(get_me))
        .route("/products", get(get_product_access))
        .route("/authorities/{authority}", get(check_authority))
}
