use serde::{Deserialize, Serialize};

/// Tokens at or below this confidence (0-100) are dropped in structured mode
pub const DEFAULT_MIN_CONFIDENCE: f32 = 60.0;

fn default_min_confidence() -> f32 {
    DEFAULT_MIN_CONFIDENCE
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    /// ISO 639-1 hint for both OCR and translation, `None` lets them guess
    pub source_lang: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            source_lang: None,
        }
    }
}
