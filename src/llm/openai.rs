//! `OpenAI` chat-completions provider implementation
//!
//! This is the fallback side of the generator: it only sees traffic after
//! the primary provider has failed with an unavailability signature. The
//! history translation lives in [`to_messages`] so both directions of the
//! role remapping are testable in isolation.

use super::types::{Role, Turn};
use super::{ChatCompleteApi, LlmError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible service implementation
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// `base_url` overrides the public endpoint, used by tests and gateways.
    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
        })
    }
}

/// Translate the turn history into chat-completion message shape: a
/// system-role message carrying the instruction comes first, assistant turns
/// take the "assistant" role, and every other role passes through unchanged.
pub(crate) fn to_messages(system_instruction: &str, history: &[Turn]) -> Vec<OpenAiMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(OpenAiMessage {
        role: "system".to_string(),
        content: system_instruction.to_string(),
    });

    for turn in history {
        let role = match turn.role {
            Role::Assistant => "assistant",
            Role::User => "user",
        };
        messages.push(OpenAiMessage {
            role: role.to_string(),
            content: turn.content.clone(),
        });
    }

    messages
}

#[async_trait]
impl ChatCompleteApi for OpenAiClient {
    async fn chat_complete(
        &self,
        model_id: &str,
        system_instruction: &str,
        history: &[Turn],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request = OpenAiRequest {
            model: model_id.to_string(),
            messages: to_messages(system_instruction, history),
            temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
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
            if let Ok(error_resp) = serde_json::from_str::<OpenAiErrorResponse>(&body) {
                let message = error_resp.error.message;
                return Err(match status.as_u16() {
                    400 => LlmError::invalid_request(format!("Invalid request: {message}")),
                    401 => LlmError::auth(format!("Authentication failed: {message}")),
                    429 => LlmError::rate_limit(format!("Rate limit exceeded: {message}")),
                    500..=599 => {
                        LlmError::server_error(format!("Server error (HTTP {status}): {message}"))
                    }
                    _ => LlmError::unknown(format!("HTTP {status}: {message}")),
                });
            }
            return Err(LlmError::unknown(format!("HTTP {status} error: {body}")));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        extract_text(openai_response)
    }
}

fn extract_text(resp: OpenAiResponse) -> Result<String, LlmError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::unknown("No choices in response"))?;

    Ok(choice.message.content.unwrap_or_default())
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiMessage {
    pub(crate) role: String,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiError,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    message: String,
    #[allow(dead_code)]
    r#type: Option<String>,
    #[allow(dead_code)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_message_comes_first() {
        let messages = to_messages("Business Planning Assistant", &[Turn::user("hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Business Planning Assistant");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn assistant_role_is_remapped() {
        let history = [Turn::user("q"), Turn::assistant("a")];
        let messages = to_messages("sys", &history);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[2].content, "a");
    }

    #[test]
    fn empty_history_still_carries_system_message() {
        let messages = to_messages("sys", &[]);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");
    }

    #[test]
    fn extract_text_takes_first_choice() {
        let resp = OpenAiResponse {
            choices: vec![
                OpenAiChoice {
                    message: OpenAiResponseMessage {
                        content: Some("first".to_string()),
                    },
                },
                OpenAiChoice {
                    message: OpenAiResponseMessage {
                        content: Some("second".to_string()),
                    },
                },
            ],
        };
        assert_eq!(extract_text(resp).unwrap(), "first");
    }

    #[test]
    fn extract_text_rejects_empty_choices() {
        let resp = OpenAiResponse { choices: vec![] };
        assert!(extract_text(resp).is_err());
    }
}
