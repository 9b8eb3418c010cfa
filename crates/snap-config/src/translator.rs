use serde::{Deserialize, Serialize};

pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

fn default_to_lang() -> String {
    "en".to_string()
}

fn default_api_url() -> String {
    GOOGLE_TRANSLATE_URL.to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_to_lang")]
    pub target_lang: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            target_lang: default_to_lang(),
            api_url: default_api_url(),
        }
    }
}
