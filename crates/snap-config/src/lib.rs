use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::ocr::OcrConfig;
use self::tesseract::TesseractConfig;
use self::translator::TranslatorConfig;

pub mod capture;
pub mod ocr;
pub mod tesseract;
pub mod translator;

pub use tesseract::{TessdataSource, resolve_tessdata_dir};

/// Env var naming the config file to load
pub const CONFIG_PATH_ENV: &str = "SNAPTRANSLATE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_delta_time_ms() -> u64 {
    50
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tesseract: TesseractConfig,
    pub ocr: OcrConfig,
    pub translator: TranslatorConfig,
    pub capture: CaptureConfig,

    /// Hotkey poll interval
    #[serde(default = "default_delta_time_ms")]
    pub delta_time_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tesseract: TesseractConfig::default(),
            ocr: OcrConfig::default(),
            translator: TranslatorConfig::default(),
            capture: CaptureConfig::default(),
            delta_time_ms: default_delta_time_ms(),
        }
    }
}

impl Config {
    /// Load from `SNAPTRANSLATE_CONFIG` or `config.json`, then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env();
        Ok(config)
    }

    /// Missing file means defaults, a malformed one is an error
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    fn apply_env(&mut self) {
        if let Some(delta_time_ms) = env::var("DELTA_TIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.delta_time_ms = delta_time_ms;
        }

        if let Ok(to_lang) = env::var("SNAPTRANSLATE_TARGET_LANG") {
            self.translator.target_lang = to_lang;
        }
    }
}
