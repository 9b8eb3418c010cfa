use kanal::AsyncSender;
use snap_types::AppEvent;

use crate::state::AppState;

/// One capture-extract-translate run, result posted to the UI
pub async fn handle_capture_trigger(
    state: &AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (from_lang, to_lang) = {
        let config = state.config.read().await;
        (
            config.ocr.source_lang.clone(),
            config.translator.target_lang.clone(),
        )
    };

    let outcome = state
        .pipeline
        .run(state.capture.clone(), from_lang.as_deref(), &to_lang)
        .await;

    match outcome {
        Some(outcome) => {
            tracing::debug!("Pipeline finished: {:?}", outcome);
            app_to_ui_tx
                .send(AppEvent::ShowOutcome {
                    outcome,
                    from_lang: from_lang.unwrap_or_else(|| snap_translator::AUTO.to_string()),
                    to_lang,
                })
                .await?;
        }
        None => {
            app_to_ui_tx
                .send(AppEvent::PipelineStatus {
                    status: "Capture cancelled".to_string(),
                    busy: false,
                })
                .await?;
        }
    }

    Ok(())
}
