use anyhow::Context;
use clap::Parser;
use pinhole_gateway::{telemetry, App, AppState, Cli, Config};
use pinhole_storage::{spawn_sweeper, Storage};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_json);

    let config = Config::load(&cli).context("failed to load configuration")?;
    if config.ttl().is_never() {
        info!("ttl of url is set to store urls forever");
    }

    let storage = Arc::new(
        Storage::open(&config.storage_settings()).context("failed to open url storage")?,
    );
    let sweeper = config
        .sweep_interval()
        .map(|interval| spawn_sweeper(Arc::clone(&storage), interval));

    let state = AppState::new(storage.clone(), config.ttl(), config.hostname.clone());

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    info!(
        listen_addr = %listener.local_addr()?,
        storage_backend = storage.kind(),
        uri_length = config.uri_length,
        ttl_secs = config.ttl_secs,
        "starting pinhole gateway"
    );

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    storage.flush().await.context("failed to flush url storage")?;
    info!("pinhole gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
