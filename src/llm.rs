//! Language-model provider
//!
//! `LanguageModel` is the seam the extractor and summarizer call through.
//! `GeminiClient` talks to Google's `generateContent` REST endpoint using a
//! long-lived reqwest::Client for connection pooling.

use crate::config::Config;
use crate::error::MetricsError;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info};

/// Sampling settings for a single completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: i32,
    pub max_output_tokens: i32,
}

impl GenerationOptions {
    /// Near-deterministic settings for structured extraction
    pub const EXTRACTION: Self = Self {
        temperature: 0.0,
        top_p: 1.0,
        top_k: 1,
        max_output_tokens: 512,
    };

    /// Settings for short narrative analysis
    pub const NARRATIVE: Self = Self {
        temperature: 0.4,
        top_p: 0.9,
        top_k: 40,
        max_output_tokens: 1024,
    };
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::NARRATIVE
    }
}

/// Single-prompt text generation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String>;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            endpoint: config.generate_content_url(),
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str, options: GenerationOptions) -> Result<String> {
        if self.api_key.trim().is_empty() {
            return Err(MetricsError::ConfigError(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                top_p: options.top_p,
                top_k: options.top_k,
                max_output_tokens: options.max_output_tokens,
            },
        };

        info!(prompt_chars = prompt.len(), "Calling Gemini API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                MetricsError::LlmError(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response ({}): {}", status, error_text);
            return Err(MetricsError::LlmError(format!(
                "Gemini API returned {}: {}",
                status, error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            MetricsError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        let text = response_text(&gemini_response)?;

        if let Some(usage) = &gemini_response.usage_metadata {
            debug!(
                prompt_tokens = usage.prompt_token_count,
                response_tokens = usage.candidates_token_count,
                "Gemini token usage"
            );
        }
        info!(response_chars = text.len(), "Gemini response received");

        Ok(text)
    }
}

/// Join the text parts of the first candidate
fn response_text(response: &GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| MetricsError::LlmError("No response from Gemini API".to_string()))?;

    let text: String = candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(MetricsError::LlmError(format!(
            "Empty response from Gemini (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: i32,
    #[serde(default)]
    candidates_token_count: i32,
}

/// Canned language model for development & testing
///
/// Replies with a fixed response (or a fixed failure) and records every
/// prompt it receives.
pub struct MockLanguageModel {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockLanguageModel {
    pub fn replying(response: impl Into<String>) -> Self {
        Self {
            reply: Ok(response.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate(&self, prompt: &str, _options: GenerationOptions) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.reply.clone().map_err(MetricsError::LlmError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "News Article: Walmart posts record revenue".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 512,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["contents"][0]["parts"][0]["text"],
            "News Article: Walmart posts record revenue"
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(json["generationConfig"]["topK"], 1);
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "```json\n{" }, { "text": "}\n```" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 30 }
        }))
        .unwrap();

        assert_eq!(response_text(&response).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn test_response_without_candidates_is_error() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response_text(&response).is_err());

        let blocked: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        let err = response_text(&blocked).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let client = GeminiClient::new(&Config::new("")).unwrap();
        let result = client.generate("hello", GenerationOptions::default()).await;
        assert!(matches!(result, Err(MetricsError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_mock_records_prompts() {
        let model = MockLanguageModel::replying("ok");
        let reply = model.generate("first", GenerationOptions::EXTRACTION).await.unwrap();
        assert_eq!(reply, "ok");
        assert_eq!(model.prompts(), vec!["first".to_string()]);

        let failing = MockLanguageModel::failing("quota exceeded");
        assert!(failing.generate("x", GenerationOptions::NARRATIVE).await.is_err());
    }
}
