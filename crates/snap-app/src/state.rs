use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use snap_config::Config;
use snap_core::Pipeline;
use snap_ocr::{CaptureSource, ScreenCapture, TesseractEngine, TextExtractor};
use snap_translator::{GoogleTranslator, TextTranslator};
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub pipeline: Pipeline,
    pub capture: Arc<dyn CaptureSource>,
    /// Set while a capture-extract-translate run is in flight, see [`AppState::try_begin`]
    pub busy: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (tessdata_dir, source) = config.tesseract.resolve_tessdata_dir();
        tracing::info!("Tesseract data: {} ({:?})", tessdata_dir.display(), source);

        let engine = TesseractEngine::new(config.tesseract.binary.clone(), Some(tessdata_dir));
        let extractor =
            TextExtractor::with_min_confidence(Arc::new(engine), config.ocr.min_confidence);
        let translator = TextTranslator::new(Arc::new(GoogleTranslator::new(
            config.translator.api_url.clone(),
        )));
        let capture = Arc::new(ScreenCapture::new(config.capture.region));

        Self::with_parts(config, Pipeline::new(Arc::new(extractor), translator), capture)
    }

    pub fn with_parts(
        config: Config,
        pipeline: Pipeline,
        capture: Arc<dyn CaptureSource>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            pipeline,
            capture,
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the single run slot, `None` when a run is already in flight
    pub fn try_begin(self: &Arc<Self>) -> Option<BusyGuard> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(BusyGuard(self.clone()))
    }
}

/// Releases the run slot when dropped, including while unwinding from a panic
pub struct BusyGuard(Arc<AppState>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::SeqCst);
    }
}
