//! fakesvc server binary.
//!
//! Loads config (`$FAKESVC_CONFIG`, `./fakesvc.yaml`, or defaults), builds the
//! shared state and serves the router until Ctrl-C.

use tracing_subscriber::{fmt, EnvFilter};

use fakesvc_core::error::{FakeSvcError, Result};
use fakesvc_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "fakesvc-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let state = app_state::AppState::new(config::load_default()?)?;
    let listen = state.cfg().server.listen_addr()?;
    let app = router::build_router(state);

    tracing::info!(%listen, "fakesvc-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| FakeSvcError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FakeSvcError::Internal(format!("server failed: {e}")))?;

    tracing::info!("fakesvc-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
