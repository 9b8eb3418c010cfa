//! Event loop behaviour with scripted OCR and translation backends

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use snap_config::Config;
use snap_core::{Pipeline, PipelineState};
use snap_ocr::{CaptureSource, EngineError, OcrEngine, OcrWord, TextExtractor};
use snap_translator::{
    LanguageCode, ProviderMetadata, TextTranslator, TranslateError, Translator,
};
use snap_types::{AppEvent, LanguageDetection, PipelineOutcome, RasterImage, TranslationResult};
use tokio::time::timeout;

use crate::events::event_loop;
use crate::events::translate_last::CAPTURE_FIRST_MESSAGE;
use crate::io::parse_command;
use crate::state::AppState;
use crate::status::status_message;

struct FixedEngine(&'static str);

impl OcrEngine for FixedEngine {
    fn image_to_string(&self, _png: &[u8], _language: Option<&str>) -> Result<String, EngineError> {
        Ok(self.0.to_string())
    }

    fn image_to_data(
        &self,
        _png: &[u8],
        _language: Option<&str>,
    ) -> Result<Vec<OcrWord>, EngineError> {
        Ok(vec![])
    }
}

struct Reverser;

#[async_trait::async_trait]
impl Translator for Reverser {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<TranslationResult, TranslateError> {
        Ok(TranslationResult {
            text: text.chars().rev().collect(),
            source_language: from,
            destination_language: to,
        })
    }

    async fn detect_language(&self, _text: &str) -> Result<LanguageDetection, TranslateError> {
        Err(TranslateError::ApiError("unsupported".to_string()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "reverser".to_string(),
        }
    }
}

struct StaticCapture(Option<RasterImage>);

impl CaptureSource for StaticCapture {
    fn capture_region(&self) -> anyhow::Result<Option<RasterImage>> {
        Ok(self.0.clone())
    }
}

fn app_state(ocr_text: &'static str, image: Option<RasterImage>) -> Arc<AppState> {
    let mut config = Config::default();
    config.translator.target_lang = "ru".to_string();

    let pipeline = Pipeline::new(
        Arc::new(TextExtractor::new(Arc::new(FixedEngine(ocr_text)))),
        TextTranslator::new(Arc::new(Reverser)),
    );
    Arc::new(AppState::with_parts(
        config,
        pipeline,
        Arc::new(StaticCapture(image)),
    ))
}

fn start(
    state: Arc<AppState>,
) -> (
    AsyncSender<AppEvent>,
    AsyncReceiver<AppEvent>,
    tokio::task::JoinHandle<anyhow::Result<()>>,
) {
    let (ui_to_app_tx, ui_to_app_rx) = kanal::bounded_async(8);
    let (app_to_ui_tx, app_to_ui_rx) = kanal::bounded_async(8);
    let handle = tokio::spawn(event_loop(state, ui_to_app_rx, app_to_ui_tx));
    (ui_to_app_tx, app_to_ui_rx, handle)
}

async fn next_event(rx: &AsyncReceiver<AppEvent>) -> AppEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("Timeout - event never arrived!")
        .expect("channel closed")
}

async fn wait_until_idle(state: &AppState) {
    timeout(Duration::from_secs(2), async {
        while state.busy.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("busy flag never released");
}

#[tokio::test]
async fn test_trigger_shows_translation() {
    let state = app_state("abc", Some(RasterImage::filled(8, 8, [255, 255, 255])));
    let (tx, rx, _handle) = start(state.clone());

    tx.send(AppEvent::TriggerCapture).await.unwrap();

    match next_event(&rx).await {
        AppEvent::ShowOutcome {
            outcome,
            from_lang,
            to_lang,
        } => {
            assert_eq!(outcome, PipelineOutcome::Translated("cba".to_string()));
            assert_eq!(from_lang, "auto");
            assert_eq!(to_lang, "ru");
        }
        other => panic!("Wrong event: {other:?}"),
    }

    // busy flag is released once the worker finishes
    wait_until_idle(&state).await;
    assert!(state.pipeline.last_image().is_some());
}

#[tokio::test]
async fn test_blank_capture_shows_no_text() {
    let state = app_state("", Some(RasterImage::filled(8, 8, [255, 255, 255])));
    let (tx, rx, _handle) = start(state);

    tx.send(AppEvent::TriggerCapture).await.unwrap();

    match next_event(&rx).await {
        AppEvent::ShowOutcome { outcome, .. } => {
            assert_eq!(outcome, PipelineOutcome::NoTextFound)
        }
        other => panic!("Wrong event: {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_capture_reports_status() {
    let state = app_state("abc", None);
    let (tx, rx, _handle) = start(state.clone());

    tx.send(AppEvent::TriggerCapture).await.unwrap();

    match next_event(&rx).await {
        AppEvent::PipelineStatus { status, busy } => {
            assert_eq!(status, "Capture cancelled");
            assert!(!busy);
        }
        other => panic!("Wrong event: {other:?}"),
    }
    assert_eq!(state.pipeline.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_trigger_while_busy_is_dropped() {
    let state = app_state("abc", Some(RasterImage::filled(8, 8, [255, 255, 255])));
    state.busy.store(true, Ordering::SeqCst);
    let (tx, rx, _handle) = start(state.clone());

    tx.send(AppEvent::TriggerCapture).await.unwrap();

    match next_event(&rx).await {
        AppEvent::PipelineStatus { status, busy } => {
            assert_eq!(status, "Busy");
            assert!(busy);
        }
        other => panic!("Wrong event: {other:?}"),
    }
    assert!(state.pipeline.last_image().is_none());
}

#[tokio::test]
async fn test_shutdown_stops_event_loop() {
    let state = app_state("abc", None);
    let (tx, _rx, handle) = start(state);

    tx.send(AppEvent::Shutdown).await.unwrap();

    let result = timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_translate_last_without_capture_asks_for_one() {
    let state = app_state("abc", Some(RasterImage::filled(8, 8, [255, 255, 255])));
    let (tx, rx, _handle) = start(state.clone());

    tx.send(AppEvent::TranslateLast {
        from: Some("ru".to_string()),
    })
    .await
    .unwrap();

    match next_event(&rx).await {
        AppEvent::PipelineStatus { status, busy } => {
            assert_eq!(status, CAPTURE_FIRST_MESSAGE);
            assert!(!busy);
        }
        other => panic!("Wrong event: {other:?}"),
    }
    wait_until_idle(&state).await;
    assert_eq!(state.pipeline.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_translate_last_reuses_stored_capture() {
    let state = app_state("hej", Some(RasterImage::filled(8, 8, [255, 255, 255])));
    let (tx, rx, _handle) = start(state.clone());

    tx.send(AppEvent::TriggerCapture).await.unwrap();
    assert!(matches!(next_event(&rx).await, AppEvent::ShowOutcome { .. }));
    wait_until_idle(&state).await;
    let first = state.pipeline.last_image().unwrap();

    tx.send(AppEvent::TranslateLast {
        from: Some("sv".to_string()),
    })
    .await
    .unwrap();

    match next_event(&rx).await {
        AppEvent::ShowOutcome {
            outcome,
            from_lang,
            to_lang,
        } => {
            assert_eq!(outcome, PipelineOutcome::Translated("jeh".to_string()));
            assert_eq!(from_lang, "sv");
            assert_eq!(to_lang, "ru");
        }
        other => panic!("Wrong event: {other:?}"),
    }
    wait_until_idle(&state).await;
    // no new capture was taken
    assert!(Arc::ptr_eq(&first, &state.pipeline.last_image().unwrap()));
}

#[tokio::test]
async fn test_translate_last_while_busy_is_dropped() {
    let state = app_state("abc", None);
    state.busy.store(true, Ordering::SeqCst);
    let (tx, rx, _handle) = start(state);

    tx.send(AppEvent::TranslateLast { from: None }).await.unwrap();

    match next_event(&rx).await {
        AppEvent::PipelineStatus { status, busy } => {
            assert_eq!(status, "Busy");
            assert!(busy);
        }
        other => panic!("Wrong event: {other:?}"),
    }
}

#[tokio::test]
async fn test_busy_released_when_worker_panics() {
    let state = app_state("abc", None);

    let guard = state.try_begin().unwrap();
    assert!(state.try_begin().is_none());

    let result: Result<(), _> = tokio::spawn(async move {
        let _guard = guard;
        panic!("translation worker crashed");
    })
    .await;

    assert!(result.unwrap_err().is_panic());
    assert!(!state.busy.load(Ordering::SeqCst));
    assert!(state.try_begin().is_some());
}

#[test]
fn test_parse_command() {
    assert!(matches!(
        parse_command("capture"),
        Some(AppEvent::TriggerCapture)
    ));
    assert!(matches!(parse_command(" c "), Some(AppEvent::TriggerCapture)));
    assert!(matches!(
        parse_command("translate SV"),
        Some(AppEvent::TranslateLast { from: Some(lang) }) if lang == "sv"
    ));
    assert!(matches!(
        parse_command("t"),
        Some(AppEvent::TranslateLast { from: None })
    ));
    assert!(parse_command("").is_none());
    assert!(parse_command("quit").is_none());
}

#[test]
fn test_status_messages() {
    assert_eq!(
        status_message(&PipelineState::Extracting),
        Some("Extracting text...")
    );
    assert_eq!(status_message(&PipelineState::Translating), Some("Translating..."));
    assert_eq!(
        status_message(&PipelineState::Done(PipelineOutcome::NoTextFound)),
        None
    );
}
