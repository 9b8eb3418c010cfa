use std::sync::{Arc, Mutex, PoisonError};

use snap_ocr::{CaptureSource, TextExtractor};
use snap_translator::TextTranslator;
use snap_types::{PipelineOutcome, RasterImage};
use tokio::sync::watch;

/// Progress of a single capture-extract-translate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Capturing,
    Extracting,
    Translating,
    Done(PipelineOutcome),
}

impl PipelineState {
    /// Transitions only move forward within a run; a new run starts from Idle or Done
    pub fn can_advance_to(&self, next: &PipelineState) -> bool {
        use PipelineState::*;

        matches!(
            (self, next),
            (Idle | Done(_), Capturing | Extracting)
                | (Capturing, Idle | Extracting | Done(_))
                | (Extracting, Translating | Done(_))
                | (Translating, Done(_))
        )
    }
}

/// Sequences capture, extraction and translation.
///
/// Every failure ends up as a [`PipelineOutcome`]; nothing is returned as an
/// error. Progress is published on a watch channel.
pub struct Pipeline {
    extractor: Arc<TextExtractor>,
    translator: TextTranslator,
    state: watch::Sender<PipelineState>,
    last_image: Mutex<Option<Arc<RasterImage>>>,
}

impl Pipeline {
    pub fn new(extractor: Arc<TextExtractor>, translator: TextTranslator) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            extractor,
            translator,
            state,
            last_image: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    /// Image of the most recent successful capture
    pub fn last_image(&self) -> Option<Arc<RasterImage>> {
        self.last_image
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Capture then process. `None` when the user cancelled the selection.
    pub async fn run(
        &self,
        source: Arc<dyn CaptureSource>,
        from: Option<&str>,
        to: &str,
    ) -> Option<PipelineOutcome> {
        self.transition(PipelineState::Capturing);

        let captured = tokio::task::spawn_blocking(move || source.capture_region()).await;
        let image = match captured {
            Ok(Ok(Some(image))) => Arc::new(image),
            Ok(Ok(None)) => {
                tracing::info!("Capture cancelled");
                self.transition(PipelineState::Idle);
                return None;
            }
            Ok(Err(e)) => {
                tracing::error!("Capture failed: {:#}", e);
                return Some(self.finish(PipelineOutcome::Failed(format!(
                    "Capture failed: {e:#}"
                ))));
            }
            Err(e) => {
                tracing::error!("Capture task error: {}", e);
                return Some(self.finish(PipelineOutcome::Failed(format!(
                    "Capture task error: {e}"
                ))));
            }
        };

        *self
            .last_image
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(image.clone());

        Some(self.process(image, from, to).await)
    }

    /// Extract and translate an already captured image
    pub async fn process(
        &self,
        image: Arc<RasterImage>,
        from: Option<&str>,
        to: &str,
    ) -> PipelineOutcome {
        self.transition(PipelineState::Extracting);
        let outcome = self.extract_and_translate(image, from, to).await;
        self.finish(outcome)
    }

    async fn extract_and_translate(
        &self,
        image: Arc<RasterImage>,
        from: Option<&str>,
        to: &str,
    ) -> PipelineOutcome {
        let extractor = self.extractor.clone();
        let hint = from.map(str::to_string);

        let extracted =
            tokio::task::spawn_blocking(move || extractor.extract_text(&image, hint.as_deref()))
                .await;

        let text = match extracted {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::error!("Extraction rejected input: {}", e);
                return PipelineOutcome::Failed(e.to_string());
            }
            Err(e) => {
                tracing::error!("OCR task error: {}", e);
                return PipelineOutcome::Failed(format!("OCR task error: {e}"));
            }
        };

        if text.trim().is_empty() {
            return PipelineOutcome::NoTextFound;
        }
        tracing::debug!("Extracted {} chars", text.len());

        self.transition(PipelineState::Translating);
        // error messages from the fail-closed contract are displayed like a translation
        let translated = self.translator.translate_or_empty(&text, from, to).await;
        PipelineOutcome::Translated(translated)
    }

    fn finish(&self, outcome: PipelineOutcome) -> PipelineOutcome {
        self.transition(PipelineState::Done(outcome.clone()));
        outcome
    }

    fn transition(&self, next: PipelineState) {
        let previous = self.state.send_replace(next.clone());
        if previous.can_advance_to(&next) {
            tracing::debug!("Pipeline {:?} -> {:?}", previous, next);
        } else {
            tracing::warn!("Unexpected pipeline transition {:?} -> {:?}", previous, next);
        }
    }
}
