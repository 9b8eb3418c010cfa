use std::sync::Arc;

use image::{ExtendedColorType, ImageEncoder};
use snap_types::{BoundingBox, ExtractionResult, PixelFormat, RasterImage};

use crate::engine::{EngineError, OcrEngine};

pub const DEFAULT_MIN_CONFIDENCE: f32 = 60.0;

/// ISO 639-1 codes that differ from the engine's own identifiers
static LANGUAGE_HINTS: &[(&str, &str)] = &[("ru", "rus")];

/// Map a short ISO code to the engine's identifier, passing unknown codes through
pub fn map_language_hint(code: &str) -> &str {
    LANGUAGE_HINTS
        .iter()
        .find(|(iso, _)| *iso == code)
        .map(|(_, engine)| *engine)
        .unwrap_or(code)
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Caller bug, never degraded to an empty result
    #[error("Invalid input image: {0}")]
    Precondition(String),

    #[error("OCR failed: {0}")]
    Extraction(String),
}

impl From<EngineError> for ExtractError {
    fn from(e: EngineError) -> Self {
        ExtractError::Extraction(e.to_string())
    }
}

/// OCR front end with a lenient and a strict operation
pub struct TextExtractor {
    engine: Arc<dyn OcrEngine>,
    min_confidence: f32,
}

impl TextExtractor {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self::with_min_confidence(engine, DEFAULT_MIN_CONFIDENCE)
    }

    pub fn with_min_confidence(engine: Arc<dyn OcrEngine>, min_confidence: f32) -> Self {
        Self {
            engine,
            min_confidence,
        }
    }

    /// Plain-text mode.
    ///
    /// Returns the trimmed recognized text. Engine failures are logged and
    /// come back as an empty string; only an empty image is an error.
    pub fn extract_text(
        &self,
        image: &RasterImage,
        language_hint: Option<&str>,
    ) -> Result<String, ExtractError> {
        check_image(image)?;

        let recognized = encode_png(image).and_then(|png| {
            self.engine
                .image_to_string(&png, language_hint.map(map_language_hint))
                .map_err(ExtractError::from)
        });

        match recognized {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                tracing::error!("{}", e);
                Ok(String::new())
            }
        }
    }

    /// Structured mode.
    ///
    /// Keeps tokens above the confidence threshold that are not blank, in
    /// engine order. Engine failures propagate.
    pub fn extract_structured(
        &self,
        image: &RasterImage,
        language_hint: Option<&str>,
    ) -> Result<ExtractionResult, ExtractError> {
        check_image(image)?;

        let png = encode_png(image)?;
        let words = self
            .engine
            .image_to_data(&png, language_hint.map(map_language_hint))?;

        let boxes: Vec<BoundingBox> = words
            .into_iter()
            .filter(|w| w.confidence > self.min_confidence)
            .filter_map(|w| {
                let text = w.text.trim();
                (!text.is_empty()).then(|| BoundingBox {
                    text: text.to_string(),
                    left: w.left,
                    top: w.top,
                    right: w.left + w.width,
                    bottom: w.top + w.height,
                })
            })
            .collect();

        let combined_text = boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(ExtractionResult {
            combined_text,
            boxes,
        })
    }
}

fn check_image(image: &RasterImage) -> Result<(), ExtractError> {
    if image.is_empty() {
        return Err(ExtractError::Precondition(format!(
            "image is empty ({}x{}, {} bytes)",
            image.width(),
            image.height(),
            image.data().len()
        )));
    }
    Ok(())
}

/// Lossless re-encoding handed to the engine
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, ExtractError> {
    let color = match image.format() {
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
    };

    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(image.data(), image.width(), image.height(), color)
        .map_err(|e| ExtractError::Extraction(format!("Failed to encode PNG: {e}")))?;
    Ok(buffer)
}
