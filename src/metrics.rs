//! Prometheus metrics.
//!
//! Counters are recorded through the `metrics` facade and are no-ops until
//! [`init_metrics`] installs the exporter, so tests and deployments without
//! `METRICS_ADDR` pay nothing for them.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::{error, info};

/// Installs the Prometheus recorder and spawns its upkeep task.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ],
        )
        .context("Failed to set histogram buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(handle)
}

/// Router for metrics server
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// Starts the exporter and serves `/metrics` on `addr` in the background.
pub async fn spawn_metrics_server(addr: SocketAddr) -> anyhow::Result<()> {
    let handle = init_metrics()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;

    info!(%addr, "Metrics exporter listening");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
            error!(error = %e, "Metrics server stopped");
        }
    });

    Ok(())
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    response
}

/// Outcome of the gateway's authorization stage: `bypass`, `authenticated`,
/// or the rejection's error code.
pub fn track_edge_decision(outcome: &'static str) {
    counter!("edge_auth_decisions_total", "outcome" => outcome).increment(1);
}

pub fn track_internal_rejection() {
    counter!("internal_trust_rejections_total").increment(1);
}

/// Where an internal service took the caller's identity from.
pub fn track_identity_source(source: &'static str) {
    counter!("internal_identity_source_total", "source" => source).increment(1);
}

pub fn track_upstream_request(route: &str, status: &str) {
    counter!(
        "proxy_upstream_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
