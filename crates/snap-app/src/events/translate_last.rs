use kanal::AsyncSender;
use snap_types::AppEvent;

use crate::state::AppState;

pub const CAPTURE_FIRST_MESSAGE: &str = "Please capture an image first.";

/// Translate the stored capture again with a source language picked by the user
pub async fn handle_translate_last(
    state: &AppState,
    from: Option<String>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(image) = state.pipeline.last_image() else {
        tracing::info!("No capture stored yet");
        app_to_ui_tx
            .send(AppEvent::PipelineStatus {
                status: CAPTURE_FIRST_MESSAGE.to_string(),
                busy: false,
            })
            .await?;
        return Ok(());
    };

    let to_lang = state.config.read().await.translator.target_lang.clone();
    let outcome = state
        .pipeline
        .process(image, from.as_deref(), &to_lang)
        .await;
    tracing::debug!("Re-translation finished: {:?}", outcome);

    app_to_ui_tx
        .send(AppEvent::ShowOutcome {
            outcome,
            from_lang: from.unwrap_or_else(|| snap_translator::AUTO.to_string()),
            to_lang,
        })
        .await?;

    Ok(())
}
