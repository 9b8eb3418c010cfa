use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Env var consulted when the config has no `tessdata_dir`
pub const TESSDATA_ENV: &str = "TESSDATA_PREFIX";

#[cfg(windows)]
pub const FALLBACK_TESSDATA_DIR: &str = r"C:\Program Files\Tesseract-OCR\tessdata";
#[cfg(target_os = "macos")]
pub const FALLBACK_TESSDATA_DIR: &str = "/opt/homebrew/share/tessdata";
#[cfg(not(any(windows, target_os = "macos")))]
pub const FALLBACK_TESSDATA_DIR: &str = "/usr/share/tesseract-ocr/5/tessdata";

fn default_binary() -> String {
    "tesseract".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TesseractConfig {
    /// Directory holding the `*.traineddata` files
    pub tessdata_dir: Option<String>,
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            tessdata_dir: None,
            binary: default_binary(),
        }
    }
}

impl TesseractConfig {
    /// Resolve against the process environment. Call once at startup.
    pub fn resolve_tessdata_dir(&self) -> (PathBuf, TessdataSource) {
        resolve_tessdata_dir(self.tessdata_dir.as_deref(), env::var(TESSDATA_ENV).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TessdataSource {
    Config,
    Environment,
    Fallback,
}

/// Config entry, then environment, then the hardcoded platform path.
pub fn resolve_tessdata_dir(
    configured: Option<&str>,
    from_env: Option<String>,
) -> (PathBuf, TessdataSource) {
    if let Some(dir) = configured.map(str::trim).filter(|d| !d.is_empty()) {
        return (PathBuf::from(dir), TessdataSource::Config);
    }

    if let Some(dir) = from_env.filter(|d| !d.trim().is_empty()) {
        return (PathBuf::from(dir.trim()), TessdataSource::Environment);
    }

    tracing::warn!(
        "No tessdata_dir configured and {} unset, falling back to {}",
        TESSDATA_ENV,
        FALLBACK_TESSDATA_DIR
    );
    (PathBuf::from(FALLBACK_TESSDATA_DIR), TessdataSource::Fallback)
}
