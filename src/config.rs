//! Service configuration from environment variables

use crate::auth::AllowList;
use crate::llm::{DEFAULT_MODEL_LABEL, DEFAULT_SYSTEM_INSTRUCTION};

/// Startup configuration, read once in `main`
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub firebase_db_url: Option<String>,
    pub allow_list: AllowList,
    pub default_model_label: String,
    pub default_system_instruction: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("BIZMENTOR_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let allow_list = std::env::var("AUTHORIZED_STUDENT_IDS")
            .map(|raw| AllowList::parse(&raw))
            .unwrap_or_default();

        Self {
            port,
            google_api_key: std::env::var("GOOGLE_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            firebase_db_url: std::env::var("FIREBASE_DB_URL").ok(),
            allow_list,
            default_model_label: std::env::var("DEFAULT_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL_LABEL.to_string()),
            default_system_instruction: std::env::var("SYSTEM_INSTRUCTION")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
        }
    }
}
