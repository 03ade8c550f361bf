use clap::Parser;
use markerscan::{DetectorParams, MarkerDetector};
use markerscan_server::{init_telemetry, router, AppState, ServerConfig};
use tracing::info;

type ServerResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> ServerResult<()> {
    let config = ServerConfig::parse();
    init_telemetry(config.log_json)?;

    let params = match &config.params {
        Some(path) => DetectorParams::load_json(path)?,
        None => DetectorParams::default(),
    };
    let state = AppState::new(MarkerDetector::new(params), config.max_upload_bytes);
    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %listener.local_addr()?,
        cors_origin = %config.cors_origin,
        max_upload_bytes = config.max_upload_bytes,
        "starting {}",
        markerscan_server::SERVICE_NAME
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
