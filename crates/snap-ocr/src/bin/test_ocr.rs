//! Simple OCR check - run with: cargo run -p snap-ocr --bin test_ocr [lang]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use snap_ocr::{TesseractEngine, TextExtractor};

fn main() -> Result<()> {
    let language = std::env::args().nth(1);
    let tessdata_dir = std::env::var_os("TESSDATA_PREFIX").map(PathBuf::from);

    tracing::debug!("=== OCR Test ===");

    tracing::debug!("1. Capturing primary screen...");
    let start = std::time::Instant::now();
    let image = snap_ocr::capture_primary_screen()?;
    tracing::debug!(
        "   {}x{} in {:?}",
        image.width(),
        image.height(),
        start.elapsed()
    );

    std::fs::write("test_capture.png", snap_ocr::encode_png(&image)?)?;
    tracing::debug!("   Saved to test_capture.png");

    let extractor = TextExtractor::new(Arc::new(TesseractEngine::new("tesseract", tessdata_dir)));

    tracing::debug!("2. Plain text ({:?})...", language);
    let start = std::time::Instant::now();
    let text = extractor.extract_text(&image, language.as_deref())?;
    tracing::debug!("   {:?} - {} chars", start.elapsed(), text.len());
    for line in text.lines().take(5) {
        tracing::debug!("   > {}", line);
    }

    tracing::debug!("3. Structured...");
    match extractor.extract_structured(&image, language.as_deref()) {
        Ok(result) => {
            for b in result.boxes.iter().take(10) {
                tracing::debug!(
                    "   [{},{} - {},{}] {}",
                    b.left,
                    b.top,
                    b.right,
                    b.bottom,
                    b.text
                );
            }
        }
        Err(e) => tracing::debug!("   Failed: {}", e),
    }

    tracing::debug!("=== Done ===");
    Ok(())
}
