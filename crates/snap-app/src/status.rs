use kanal::AsyncSender;
use snap_core::PipelineState;
use snap_types::AppEvent;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Status line shown for a pipeline state, `None` for states the UI skips
pub fn status_message(state: &PipelineState) -> Option<&'static str> {
    match state {
        PipelineState::Capturing => Some("Capturing..."),
        PipelineState::Extracting => Some("Extracting text..."),
        PipelineState::Translating => Some("Translating..."),
        PipelineState::Idle | PipelineState::Done(_) => None,
    }
}

/// Forward pipeline progress to the UI until cancelled
pub async fn status_loop(
    mut states: watch::Receiver<PipelineState>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = cancel.cancelled() => return Ok(()),
        }

        let message = status_message(&states.borrow_and_update());
        if let Some(status) = message {
            app_to_ui_tx
                .send(AppEvent::PipelineStatus {
                    status: status.to_string(),
                    busy: true,
                })
                .await?;
        }
    }
}
