pub mod image;
pub mod types;

pub use image::{ImageError, PixelFormat, RasterImage};
pub use types::{
    AppEvent, BoundingBox, CaptureRegion, ExtractionResult, LanguageDetection, PipelineOutcome,
    TranslationResult,
};
