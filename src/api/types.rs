//! API request and response types

use crate::llm::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Request to open a session
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub student_id: String,
}

/// Response with the minted session id
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub user_id: String,
}

/// Request to send a chat prompt
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for a completed exchange
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub feedback_pending: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Request to resolve feedback on the last reply
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub understood: bool,
}

/// Response for a feedback resolution; `reply` is present only on the
/// clarification path.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub feedback_pending: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Developer-mode settings switch
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub model: Option<String>,
    pub system_instruction: Option<String>,
}

/// One rendered turn
#[derive(Debug, Serialize)]
pub struct TurnView {
    pub role: &'static str,
    pub content: String,
}

impl From<&Turn> for TurnView {
    fn from(turn: &Turn) -> Self {
        Self {
            role: match turn.role {
                Role::User => "user",
                Role::Assistant => "assistant",
            },
            content: turn.content.clone(),
        }
    }
}

/// Full session snapshot for rendering
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub model: String,
    pub turns: Vec<TurnView>,
    pub feedback_pending: bool,
    /// Prompt input is disabled exactly while feedback is pending.
    pub input_disabled: bool,
}

/// Model information for the selector
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub label: &'static str,
    pub description: &'static str,
}

/// Response for the model list
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: &'static str,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
