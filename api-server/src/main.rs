// dexcandles API server binary
use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;

use dexcandles_api_server::{app, state::AppState};
use dexcandles_common::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "dexcandles_api_server=info,axum=info".to_string()),
        )
        .init();

    info!("Starting dexcandles API server v{}", env!("CARGO_PKG_VERSION"));

    // Initialize metrics exporter
    let recorder_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus metrics recorder")?;

    let config = Config::from_env()?;
    info!(
        "cache backend: {}, graph endpoint: {}",
        config.cache_backend.as_str(),
        config.graph_url
    );

    let state = AppState::from_config(&config)
        .await?
        .with_prometheus(recorder_handle);

    let addr: SocketAddr = format!("{}:{}", config.api_host, config.api_port)
        .parse()
        .context("invalid API_HOST/API_PORT")?;

    let app = app(state);

    info!("REST API server is running at: {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
