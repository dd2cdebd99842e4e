//! meshpolicy controller
//!
//! - Loads `meshpolicy.yaml` (or `$MESHPOLICY_CONFIG`)
//! - Runs one merge + dedup pass per resync interval
//! - Serves the last known-good snapshot, health, and metrics over HTTP

use std::net::SocketAddr;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use meshpolicy_controller::{app_state, config, router};
use meshpolicy_core::error::{MeshPolicyError, Result};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "meshpolicy-controller failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("MESHPOLICY_CONFIG").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.controller.listen.parse().map_err(|e| {
        MeshPolicyError::InvalidConfig(format!("controller.listen must be a valid SocketAddr: {e}"))
    })?;
    let period = cfg.controller.resync_interval();

    let state = app_state::AppState::new(cfg)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reconciler = tokio::spawn(state.reconciler().run(period, shutdown_rx));

    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "meshpolicy-controller starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| MeshPolicyError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MeshPolicyError::Internal(format!("server failed: {e}")))?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = reconciler.await {
        tracing::warn!(error = %e, "reconciler task ended abnormally");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
