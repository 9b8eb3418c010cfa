use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Start a capture of the configured region
    TriggerCapture,
    /// Re-run extraction and translation on the last captured image
    TranslateLast {
        from: Option<String>,
    },
    PipelineStatus {
        status: String,
        busy: bool,
    },
    ShowOutcome {
        outcome: PipelineOutcome,
        from_lang: String,
        to_lang: String,
    },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// A selection with no area, i.e. the user released without dragging
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Recognized token and its pixel box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub text: String,
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Surviving tokens joined by single spaces, in engine order
    pub combined_text: String,
    pub boxes: Vec<BoundingBox>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
    /// Resolved source language, never "auto"
    pub source_language: String,
    pub destination_language: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageDetection {
    pub language: String,
    /// 0.0 - 1.0
    pub confidence: f32,
}

/// Result of one capture-extract-translate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Translated(String),
    NoTextFound,
    Failed(String),
}

impl fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineOutcome::Translated(text) => f.write_str(text),
            PipelineOutcome::NoTextFound => f.write_str("No text found"),
            PipelineOutcome::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}
