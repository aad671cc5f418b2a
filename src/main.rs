use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use axum::Router;
use axum::routing::get;
use tessera::{app, config, initialize_state, telemetry};
use tokio::net::TcpListener;

const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::setup_logging();

    let mut config = config::Configuration::default();
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        config = config.path(PathBuf::from(path));
    }
    let config = config.read();
    let port = config.port;

    let state = initialize_state(config)?;

    let metrics = telemetry::setup_metrics_recorder()?;
    let router = Router::new()
        .route("/metrics", get(move || std::future::ready(metrics.render())))
        .merge(app(state));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "running on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
