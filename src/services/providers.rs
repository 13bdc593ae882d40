// Text Generation Provider
// Implements the OpenAI Responses API call behind the TextGenerator capability

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use super::config_store::AssistantConfig;

pub const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-5.2";

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Missing content in response")]
    MissingContent,
    #[error("JSON parse error: {0}")]
    JsonError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResult {
    pub content: String,
    pub latency_ms: i64,
}

/// Anything that turns a single instruction into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<ChatResult, ProviderError>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

pub struct ProviderClient {
    client: Client,
    responses_url: String,
}

impl Default for ProviderClient {
    fn default() -> Self {
        Self::new(OPENAI_RESPONSES_URL, Duration::from_secs(80))
    }
}

impl ProviderClient {
    pub fn new(responses_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            responses_url: responses_url.to_string(),
        }
    }

    pub async fn call_openai_responses(
        &self,
        model: &str,
        api_key: &str,
        input: &str,
    ) -> Result<ChatResult, ProviderError> {
        let request = serde_json::json!({
            "model": model,
            "input": input
        });

        let start = Instant::now();

        let response = self
            .client
            .post(&self.responses_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::JsonError(e.to_string()))?;

        let content = extract_output_text(&data).ok_or(ProviderError::MissingContent)?;
        debug!(model, latency_ms, chars = content.chars().count(), "provider.responses.ok");

        Ok(ChatResult { content, latency_ms })
    }
}

/// Concatenate every `output_text` part of every message in a Responses payload.
///
/// Payload shape: `{"output": [{"type": "message", "content": [{"type": "output_text", "text": "..."}]}]}`.
/// Returns `None` when the payload has no `output` array at all.
fn extract_output_text(data: &serde_json::Value) -> Option<String> {
    if let Some(text) = data["output_text"].as_str() {
        return Some(text.trim().to_string());
    }

    let output = data["output"].as_array()?;
    let text: String = output
        .iter()
        .filter(|item| item["type"].as_str().unwrap_or("message") == "message")
        .filter_map(|item| item["content"].as_array())
        .flatten()
        .filter(|part| part["type"] == "output_text")
        .filter_map(|part| part["text"].as_str())
        .collect();

    Some(text.trim().to_string())
}

/// OpenAI Responses model bound to a credential
pub struct OpenAiResponsesGenerator {
    client: ProviderClient,
    model: String,
    api_key: String,
}

impl OpenAiResponsesGenerator {
    pub fn new(client: ProviderClient, model: &str, api_key: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build from config; `None` when no usable credential is configured
    pub fn from_config(config: &AssistantConfig) -> Option<Self> {
        let api_key = config.usable_api_key()?;
        let client = ProviderClient::new(&config.base_url, Duration::from_secs(config.timeout_secs));
        Some(Self::new(client, &config.model, api_key))
    }
}

#[async_trait]
impl TextGenerator for OpenAiResponsesGenerator {
    async fn generate(&self, instruction: &str) -> Result<ChatResult, ProviderError> {
        self.client
            .call_openai_responses(&self.model, &self.api_key, instruction)
            .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
