use async_trait::async_trait;
use serde_json::Value;
use snap_types::{LanguageDetection, TranslationResult};

use crate::{AUTO, LanguageCode, ProviderMetadata, TranslateError, Translator};

/// Keyless Google Translate web endpoint (`client=gtx`)
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(api_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }

    async fn call(&self, text: &str, from: &str, to: &str) -> Result<Value, TranslateError> {
        let params = [
            ("client", "gtx"),
            ("sl", from),
            ("tl", to),
            ("dt", "t"),
            ("q", text),
        ];

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<TranslationResult, TranslateError> {
        let json = self.call(text, &from, &to).await?;
        parse_translation(&json, &from, &to)
    }

    async fn detect_language(&self, text: &str) -> Result<LanguageDetection, TranslateError> {
        let json = self.call(text, AUTO, "en").await?;
        parse_detection(&json)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Google Translate".to_string(),
        }
    }
}

/// `[0]` holds `[translated, original, ...]` chunks, `[2]` the detected source
pub fn parse_translation(
    json: &Value,
    from: &str,
    to: &str,
) -> Result<TranslationResult, TranslateError> {
    let segments = json[0]
        .as_array()
        .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

    let text: String = segments.iter().filter_map(|s| s[0].as_str()).collect();

    let source_language = match json[2].as_str() {
        Some(detected) => detected.to_lowercase(),
        None if from != AUTO => from.to_string(),
        None => {
            return Err(TranslateError::ApiError(
                "No detected language".to_string(),
            ));
        }
    };

    Ok(TranslationResult {
        text,
        source_language,
        destination_language: to.to_string(),
    })
}

/// Confidence lives at `[6]`, older responses only carry it under `[8][2]`
pub fn parse_detection(json: &Value) -> Result<LanguageDetection, TranslateError> {
    let language = json[2]
        .as_str()
        .ok_or_else(|| TranslateError::ApiError("No detected language".to_string()))?
        .to_lowercase();

    let confidence = json[6]
        .as_f64()
        .or_else(|| json[8][2][0].as_f64())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0) as f32;

    Ok(LanguageDetection {
        language,
        confidence,
    })
}
