use anyhow::Context;
use dotenv::dotenv;
use tracing::{info, warn};

use salon_backend::{
    app::create_router,
    app_state::AppState,
    config::{self, StoreBackend},
    db,
    telemetry::{init_telemetry, TelemetryConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::init().context("Failed to load configuration")?;
    let telemetry = init_telemetry(Some(TelemetryConfig::for_app(config))).await?;

    if config.is_production() && config.app.store_backend == StoreBackend::Memory {
        warn!("Running in production with the in-memory store");
    }
    let store = db::connect(config).await?;
    let app = create_router(AppState::new(store, config.clone()));

    let addr = config.server_addr();
    info!(
        "{} ({:?}) listening on {}",
        config.app.name, config.app.environment, addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
