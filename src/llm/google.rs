// Google Gemini adapter
// Uses the REST `generateContent` endpoint with structured output
// (responseMimeType + responseSchema).
// API Reference: https://ai.google.dev/api/generate-content

use crate::config::{LLMConfig, DEFAULT_API_BASE};
use crate::llm::provider::LLMAdapter;
use crate::types::{LLMError, LLMRequest, LLMResponse, TokenUsage};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GoogleAdapter {
    client: Client,
    api_key: String,
    api_base: String,
}

// Request types for the Gemini API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

// Response types for the Gemini API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GoogleAdapter {
    /// Adapter against the public endpoint with reqwest's default client
    pub fn new(api_key: &str) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE)
    }

    /// Adapter against a custom base URL (proxies, test servers)
    pub fn with_api_base(api_key: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Adapter built from configuration, including the request timeout
    pub fn from_config(config: &LLMConfig) -> Result<Self, LLMError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, model)
    }

    fn build_request(request: &LLMRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: Some(msg.role.clone()),
                parts: vec![GeminiPart { text: Some(msg.content.clone()) }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: request.system_instruction.as_ref().map(|text| GeminiContent {
                role: None,
                parts: vec![GeminiPart { text: Some(text.clone()) }],
            }),
            generation_config: GeminiGenerationConfig {
                response_mime_type: request.response_mime_type.clone(),
                response_schema: request.response_schema.clone(),
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LLMAdapter for GoogleAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError> {
        let url = self.generate_url(&request.model);
        let body = Self::build_request(request);

        debug!(model = %request.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                let message = match error_response.error.status {
                    Some(code) => format!("{} [{}]", error_response.error.message, code),
                    None => error_response.error.message,
                };
                return Err(LLMError::Api { status: status.as_u16(), message });
            }

            return Err(LLMError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LLMError::Decode(e.to_string()))?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .ok_or(LLMError::EmptyResponse)?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(LLMError::EmptyResponse);
        }

        let usage = gemini_response.usage_metadata.unwrap_or_default();

        Ok(LLMResponse {
            content,
            finish_reason: candidate.finish_reason.unwrap_or_else(|| "STOP".to_string()),
            usage: TokenUsage {
                prompt_tokens: usage.prompt_token_count,
                completion_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            },
        })
    }

    fn endpoint(&self) -> Option<(String, u16)> {
        let parsed = url::Url::parse(&self.api_base).ok()?;
        let host = parsed.host_str()?.to_string();
        let port = parsed.port_or_known_default()?;
        Some((host, port))
    }
}
