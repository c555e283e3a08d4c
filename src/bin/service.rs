use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use edgeguard::logging::{LogFormat, init_tracing};
use edgeguard::metrics::spawn_metrics_server;
use edgeguard::router::init_service_router;
use edgeguard::shutdown_signal;
use edgeguard::state::init_service_state;

#[derive(Parser)]
#[command(name = "edgeguard-service")]
#[command(about = "Edgeguard internal service - accepts only requests forwarded by the gateway", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "SERVICE_ADDR", default_value = "0.0.0.0:8082")]
    addr: SocketAddr,

    /// Serve Prometheus metrics on this address
    #[arg(long, env = "METRICS_ADDR")]
    metrics_addr: Option<SocketAddr>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    if let Some(metrics_addr) = cli.metrics_addr {
        spawn_metrics_server(metrics_addr).await?;
    }

    let state = init_service_state().context("Failed to initialize service")?;
    let app = init_service_router(state);

    let listener = tokio::net::TcpListener::bind(cli.addr)
        .await
        .with_context(|| format!("Failed to bind {}", cli.addr))?;

    info!(addr = %cli.addr, "Service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Service server error")?;

    Ok(())
}
