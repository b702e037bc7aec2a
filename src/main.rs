use anyhow::Context;
use coopboard::logging::init_tracing;
use coopboard::metrics::{init_metrics, metrics_app};
use coopboard::router::init_router;
use coopboard::state::init_app_state;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let state = init_app_state()?;
    let bind_addr = state.server_config.bind_addr.clone();

    let mut app = init_router(state);
    if let Some(handle) = init_metrics() {
        app = app.merge(metrics_app(handle));
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!(addr = %bind_addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}
