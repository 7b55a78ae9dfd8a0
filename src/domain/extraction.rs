use serde::{Deserialize, Serialize};

/// Connection settings for the text-extraction model that proposes header
/// mappings. The proposal path is optional; every failure degrades to
/// dictionary/manual mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            api_key: None,
            max_tokens: Some(1024),
            temperature: Some(0.0),
        }
    }
}
