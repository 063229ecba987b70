//! LLM provider abstraction
//!
//! Two providers with different message schemas sit behind small traits so
//! the generation-with-fallback routine can be exercised without a network.

mod error;
mod gemini;
mod generator;
mod models;
mod openai;
mod types;

#[cfg(test)]
mod proptests;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::GeminiClient;
pub use generator::ResponseGenerator;
pub use models::{
    all_models, resolve, ModelDef, DEFAULT_MODEL_LABEL, DEFAULT_SYSTEM_INSTRUCTION,
    FALLBACK_MODEL_ID, SAMPLING_TEMPERATURE,
};
pub use openai::OpenAiClient;
pub use types::{Role, Turn};

use async_trait::async_trait;

/// Primary provider surface: non-streaming text generation with the system
/// instruction carried as a dedicated request field, not as a turn.
#[async_trait]
pub trait GenerateApi: Send + Sync {
    async fn generate_text(
        &self,
        model_id: &str,
        history: &[Turn],
        temperature: f32,
        system_instruction: &str,
    ) -> Result<String, LlmError>;
}

/// Secondary provider surface: chat completion with the system instruction
/// prepended as a system-role message.
#[async_trait]
pub trait ChatCompleteApi: Send + Sync {
    async fn chat_complete(
        &self,
        model_id: &str,
        system_instruction: &str,
        history: &[Turn],
        temperature: f32,
    ) -> Result<String, LlmError>;
}
