use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod controller;
mod events;
mod io;
mod state;
mod status;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = snap_config::Config::load().context("Failed to load config")?;
    let state = Arc::new(AppState::new(config));

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();
    tracing::info!(
        "Ready, press Ctrl+Shift+T or type `capture`; `translate <lang>` re-runs the last capture"
    );

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {:#}", e),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    tasks.shutdown().await;
    Ok(())
}
