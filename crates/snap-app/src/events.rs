use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snap_types::AppEvent;

use crate::state::{AppState, BusyGuard};

pub mod translate_last;
pub mod trigger_capture;

use translate_last::handle_translate_last;
use trigger_capture::handle_capture_trigger;

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    tracing::debug!("Event loop started");
    loop {
        let event = ui_to_app_rx.recv().await?;
        tracing::debug!("Event received: {:?}", std::mem::discriminant(&event));

        match event {
            AppEvent::TriggerCapture => {
                let Some(guard) = begin_run(&state, &app_to_ui_tx).await else {
                    continue;
                };

                let state = state.clone();
                let tx = app_to_ui_tx.clone();
                tokio::spawn(async move {
                    let _guard = guard;
                    if let Err(e) = handle_capture_trigger(&state, &tx).await {
                        tracing::error!("Capture handler failed: {:#}", e);
                    }
                });
            }
            AppEvent::TranslateLast { from } => {
                let Some(guard) = begin_run(&state, &app_to_ui_tx).await else {
                    continue;
                };

                let state = state.clone();
                let tx = app_to_ui_tx.clone();
                tokio::spawn(async move {
                    let _guard = guard;
                    if let Err(e) = handle_translate_last(&state, from, &tx).await {
                        tracing::error!("Translate handler failed: {:#}", e);
                    }
                });
            }
            AppEvent::Shutdown => {
                tracing::info!("Event loop stopping");
                return Ok(());
            }
            AppEvent::PipelineStatus { .. } | AppEvent::ShowOutcome { .. } => {
                // UI-only events, ignore in backend
            }
        }
    }
}

/// One run at a time, the next request is dropped rather than queued
async fn begin_run(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> Option<BusyGuard> {
    let guard = state.try_begin();
    if guard.is_none() {
        tracing::info!("Run already in progress, ignoring request");
        let _ = app_to_ui_tx
            .send(AppEvent::PipelineStatus {
                status: "Busy".to_string(),
                busy: true,
            })
            .await;
    }
    guard
}
