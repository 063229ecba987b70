//! Google Gemini provider implementation
//!
//! Speaks the non-streaming `generateContent` wire format. The history
//! translation lives in [`to_contents`] so the role mapping can be tested
//! without a network call.

use super::types::{Role, Turn};
use super::{GenerateApi, LlmError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini service implementation
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// `base_url` overrides the public endpoint, used by tests and gateways.
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// Translate the turn history into Gemini's message shape: user turns keep
/// the "user" role, everything else maps to "model". Content is carried
/// verbatim as a single text part.
pub(crate) fn to_contents(history: &[Turn]) -> Vec<GeminiContent> {
    history
        .iter()
        .map(|turn| GeminiContent {
            role: Some(
                match turn.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart {
                text: turn.content.clone(),
            }],
        })
        .collect()
}

#[async_trait]
impl GenerateApi for GeminiClient {
    async fn generate_text(
        &self,
        model_id: &str,
        history: &[Turn],
        temperature: f32,
        system_instruction: &str,
    ) -> Result<String, LlmError> {
        let request = GeminiRequest {
            contents: to_contents(history),
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: system_instruction.to_string(),
                }],
            }),
            generation_config: GeminiGenerationConfig { temperature },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, model_id, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::network(format!("Connection failed: {e}"))
                } else {
                    LlmError::unknown(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            // Keep the HTTP status inside the message: the fallback decision
            // upstream matches on the failure text.
            if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                let message = error_resp.error.message;
                return Err(match status.as_u16() {
                    400 => LlmError::invalid_request(format!("Invalid request: {message}")),
                    401 | 403 => LlmError::auth(format!("Authentication failed: {message}")),
                    429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
                    500..=599 => {
                        LlmError::server_error(format!("Server error (HTTP {status}): {message}"))
                    }
                    _ => LlmError::unknown(format!("HTTP {status}: {message}")),
                });
            }
            return Err(LlmError::unknown(format!("HTTP {status} error: {body}")));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        extract_text(gemini_response)
    }
}

fn extract_text(resp: GeminiResponse) -> Result<String, LlmError> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::unknown("No candidates in response"))?;

    let text = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("");

    Ok(text)
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<String>,
    pub(crate) parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct GeminiPart {
    pub(crate) text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
    #[allow(dead_code)]
    code: Option<i32>,
    #[allow(dead_code)]
    status: Option<String>,
}
