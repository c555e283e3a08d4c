use anyhow::anyhow;
use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::StatusCode,
    response::Response,
};
use http_body_util::LengthLimitError;
use tracing::{debug, warn};

use edgeguard_core::AppError;

use crate::metrics::track_upstream_request;
use crate::modules::proxy::service::{MAX_BODY_BYTES, ProxyService};
use crate::state::GatewayState;

/// Forwards an authorized request to the upstream owning its path and
/// relays the answer.
pub async fn forward(
    State(state): State<GatewayState>,
    req: Request,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();

    let target = ProxyService::upstream_target(&state.gateway, &parts.uri).ok_or_else(|| {
        debug!(path = %parts.uri.path(), "No upstream route");
        AppError::not_found(anyhow!("No route for path"))
    })?;

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|err| {
        if err.into_inner().is::<LengthLimitError>() {
            AppError::payload_too_large(anyhow!("Request body too large"))
        } else {
            AppError::new(StatusCode::BAD_REQUEST, anyhow!("Failed to read request body"))
        }
    })?;

    let headers = ProxyService::request_headers(&parts.headers, &state.internal_secret_header);

    let upstream =
        match ProxyService::send(&state.http, parts.method, &target.url, headers, body).await {
            Ok(upstream) => upstream,
            Err(err) => {
                warn!(
                    route = %target.route,
                    timeout = err.is_timeout(),
                    error = %err,
                    "Upstream request failed"
                );
                track_upstream_request(&target.route, "error");
                return Err(AppError::bad_gateway(anyhow!("Upstream service unavailable")));
            }
        };

    let status = upstream.status();
    let headers = ProxyService::response_headers(upstream.headers());
    track_upstream_request(&target.route, status.as_str());

    let bytes = upstream.bytes().await.map_err(|err| {
        warn!(route = %target.route, error = %err, "Failed to read upstream response");
        AppError::bad_gateway(anyhow!("Upstream service unavailable"))
    })?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;

    Ok(response)
}
