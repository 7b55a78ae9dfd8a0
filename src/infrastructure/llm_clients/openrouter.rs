//! OpenRouter-backed extraction client.
//!
//! Speaks the chat-completions dialect; the only thing this crate ever
//! asks a model for is a header-mapping proposal, so the surface stays
//! one call deep. Response decoding is typed rather than pointer-based
//! so a malformed payload names what is missing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ExtractionClient;
use crate::domain::{AppError, ExtractionConfig, Result};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenRouterClient {
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn api_key(config: &ExtractionConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::LLMError("Missing API key for extraction model".to_string()))
    }

    fn completions_url(base_url: &str) -> String {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}

impl Default for OpenRouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionClient for OpenRouterClient {
    async fn generate(
        &self,
        config: &ExtractionConfig,
        system: &str,
        user: &str,
    ) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = Self::completions_url(&config.base_url);

        let request = ChatRequest {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        debug!(model = %config.model, "requesting mapping proposal");
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Extraction request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "Extraction model returned {}: {}",
                status, text
            )));
        }

        let payload: ChatResponse = response.json().await.map_err(|e| {
            AppError::LLMError(format!("Extraction response is not valid JSON: {}", e))
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::LLMError("Extraction response carried no completion".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_handles_trailing_slash() {
        assert_eq!(
            OpenRouterClient::completions_url("https://openrouter.ai/api/v1/"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(
            OpenRouterClient::completions_url("https://openrouter.ai/api/v1"),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_missing_api_key_is_reported() {
        let config = ExtractionConfig {
            api_key: None,
            ..Default::default()
        };
        assert!(matches!(
            OpenRouterClient::api_key(&config),
            Err(AppError::LLMError(_))
        ));
    }

    #[test]
    fn test_response_decoding_takes_first_choice() {
        let payload: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"{\"Zip\":\"PostalCode\"}"}}]}"#,
        )
        .unwrap();
        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("{\"Zip\":\"PostalCode\"}"));
    }
}
