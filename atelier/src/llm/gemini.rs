//! Gemini generateContent client implementing `ModelClient`.
//!
//! Talks to `POST {base}/v1beta/models/{model}:generateContent` with the API
//! key in the `x-goog-api-key` header. Every call carries the fixed system
//! instruction and asks for `application/json` output, so step replies can be
//! parsed directly.
//!
//! **Environment**: `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) for the key,
//! `GEMINI_MODEL` and `GEMINI_BASE_URL` to override model and endpoint,
//! `CHAIN_SYSTEM_PROMPT` to override the system instruction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::ChainError;
use crate::llm::{ModelClient, ModelReply, TokenUsage};

/// Model used when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Endpoint base when `GEMINI_BASE_URL` is not set.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// System instruction attached to every call unless overridden.
pub const SYSTEM_INSTRUCTION: &str =
    "Think privately but never reveal reasoning. Output only JSON or final formatted text.";

/// Gemini API client. Build with [`GeminiClient::from_env`] in binaries;
/// tests use [`GeminiClient::new`] plus the builder methods.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    system: String,
}

impl GeminiClient {
    /// Client with an explicit key; model, base URL, and system instruction
    /// come from the environment or their defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            system: std::env::var("CHAIN_SYSTEM_PROMPT")
                .unwrap_or_else(|_| SYSTEM_INSTRUCTION.to_string()),
        }
    }

    /// Reads the key from `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    /// Client from the environment; `MissingApiKey` when neither var is set.
    pub fn from_env() -> Result<Self, ChainError> {
        let key = Self::api_key_from_env().ok_or(ChainError::MissingApiKey)?;
        Ok(Self::new(key))
    }

    /// Override the model name (builder).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the endpoint base URL (builder). Used by tests to point at
    /// an unreachable address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the system instruction (builder).
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Full URL of the generateContent endpoint.
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize, Default)]
struct PartOut {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct ContentOut {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentOut>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize, Default)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
    #[serde(default)]
    error: ApiErrorDetail,
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<ModelReply, ChainError> {
        let trace_id = Uuid::new_v4().to_string();
        let url = self.generate_url();
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: &self.system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json",
            },
        };

        debug!(
            trace_id = %trace_id,
            url = %url,
            model = %self.model,
            temperature = temperature,
            prompt_len = prompt.len(),
            "Gemini generateContent"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(trace_id = %trace_id, url = %url, request = %js, "Gemini request body");
        }

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChainError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChainError::Http(e.to_string()))?;
        trace!(trace_id = %trace_id, status = %status.as_u16(), response = %body, "Gemini response body");

        if !status.is_success() {
            let detail: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = if detail.error.message.is_empty() {
                body.chars().take(200).collect()
            } else {
                detail.error.message
            };
            return Err(ChainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| ChainError::Http(format!("invalid response body: {}", e)))?;

        let usage = parsed.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ChainError::EmptyReply);
        }

        debug!(trace_id = %trace_id, reply_len = text.len(), usage = ?usage, "Gemini reply");
        Ok(ModelReply { text, usage })
    }
}
