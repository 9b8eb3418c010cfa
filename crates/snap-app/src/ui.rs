use kanal::AsyncReceiver;
use snap_types::{AppEvent, PipelineOutcome};

/// Console presenter standing in for a window
pub async fn ui_loop(app_to_ui_rx: AsyncReceiver<AppEvent>) -> anyhow::Result<()> {
    while let Ok(event) = app_to_ui_rx.recv().await {
        match event {
            AppEvent::PipelineStatus { status, busy } => {
                tracing::info!("{} (busy: {})", status, busy);
            }
            AppEvent::ShowOutcome {
                outcome,
                from_lang,
                to_lang,
            } => match outcome {
                PipelineOutcome::Translated(text) => println!("[{from_lang} -> {to_lang}] {text}"),
                other => println!("{other}"),
            },
            AppEvent::TriggerCapture | AppEvent::TranslateLast { .. } | AppEvent::Shutdown => {}
        }
    }

    Ok(())
}
