use std::sync::Arc;

use snap_types::{LanguageDetection, TranslationResult};

mod google;

pub use google::{GoogleTranslator, parse_detection, parse_translation};

pub type LanguageCode = String;

/// Source code asking the provider to detect the language
pub const AUTO: &str = "auto";
pub const DEFAULT_DESTINATION: &str = "en";

/// Shown instead of a translation when the provider is unreachable
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: please check your internet connection.";

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text, `from` may be "auto"
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<TranslationResult, TranslateError>;

    /// Detect language of text
    async fn detect_language(&self, text: &str) -> Result<LanguageDetection, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Nothing to translate")]
    EmptyInput,

    #[error("Provider returned an empty result")]
    EmptyResult,
}

impl TranslateError {
    /// Transport failures only; a malformed request (e.g. a bad `api_url`) is not one
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            TranslateError::NetworkError(e) if e.is_connect() || e.is_timeout() || e.is_request()
        )
    }
}

/// Lower-cased ISO 639-1 code, with `None`/blank meaning auto-detect
pub fn normalize_language(code: Option<&str>) -> LanguageCode {
    match code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => c.to_lowercase(),
        None => AUTO.to_string(),
    }
}

/// Destination cannot be detected, blank falls back to [`DEFAULT_DESTINATION`]
pub fn normalize_destination(code: &str) -> LanguageCode {
    match code.trim() {
        "" => DEFAULT_DESTINATION.to_string(),
        c => c.to_lowercase(),
    }
}

/// Front end offering a fail-closed and a throw-style contract over one provider
#[derive(Clone)]
pub struct TextTranslator {
    provider: Arc<dyn Translator>,
}

impl TextTranslator {
    pub fn new(provider: Arc<dyn Translator>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> String {
        self.provider.metadata().name
    }

    /// Never fails.
    ///
    /// Blank input gives "" without touching the provider; failures come back
    /// as a readable message in place of the translation.
    pub async fn translate_or_empty(&self, text: &str, from: Option<&str>, to: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        match self.request(text, from, to).await {
            Ok(result) => result.text,
            Err(e) if e.is_network() => {
                tracing::error!("Translation failed: {}", e);
                NETWORK_ERROR_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!("Translation failed: {}", e);
                format!("Translation error: {e}")
            }
        }
    }

    /// Single attempt, every failure (including an empty translation) is an error
    pub async fn translate_or_throw(
        &self,
        text: &str,
        from: Option<&str>,
        to: &str,
    ) -> Result<TranslationResult, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }
        self.request(text, from, to).await
    }

    pub async fn detect_language(&self, text: &str) -> Result<LanguageDetection, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyInput);
        }

        let detection = self.provider.detect_language(text).await?;
        if detection.language.is_empty() {
            return Err(TranslateError::EmptyResult);
        }
        Ok(detection)
    }

    async fn request(
        &self,
        text: &str,
        from: Option<&str>,
        to: &str,
    ) -> Result<TranslationResult, TranslateError> {
        let from = normalize_language(from);
        let to = normalize_destination(to);
        tracing::debug!(
            "Translating {} chars {} -> {} via {}",
            text.len(),
            from,
            to,
            self.provider_name()
        );

        let result = self.provider.translate(text, from, to).await?;
        if result.text.trim().is_empty() {
            return Err(TranslateError::EmptyResult);
        }
        Ok(result)
    }
}
