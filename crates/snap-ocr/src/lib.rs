mod capture;
mod engine;
mod extractor;
mod hotkey;

pub use capture::{CaptureSource, ScreenCapture, capture_primary_screen, capture_screen_region};
pub use engine::{EngineError, OcrEngine, OcrWord, RECOGNITION_ARGS, TesseractEngine, parse_tsv};
pub use extractor::{
    DEFAULT_MIN_CONFIDENCE, ExtractError, TextExtractor, encode_png, map_language_hint,
};
pub use hotkey::HotkeyManager;
