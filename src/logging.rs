//! Interaction log store
//!
//! Every completed exchange is written to a remote log store keyed by user
//! and timestamp. The store is write-only from this service's point of view,
//! and a failed write must never abort the in-flight chat turn: callers
//! catch the error and downgrade it to a warning.

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Interaction categories recorded with each log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    InitialQuery,
    UnderstoodFeedback,
    ClarificationRequested,
    ClarificationResponse,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::InitialQuery => "INITIAL_QUERY",
            InteractionKind::UnderstoodFeedback => "UNDERSTOOD_FEEDBACK",
            InteractionKind::ClarificationRequested => "CLARIFICATION_REQUESTED",
            InteractionKind::ClarificationResponse => "CLARIFICATION_RESPONSE",
        }
    }
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("log request failed: {0}")]
    Transport(String),
    #[error("log store rejected write: HTTP {0}")]
    Rejected(u16),
}

/// Write-only sink for interaction records
#[async_trait]
pub trait InteractionLogger: Send + Sync {
    async fn record(
        &self,
        user_id: &str,
        model_label: &str,
        prompt: &str,
        response: &str,
        kind: InteractionKind,
    ) -> Result<(), LogError>;
}

/// Firebase Realtime Database REST writer.
///
/// Entries land at `/logs/<user>/<timestamp key>` so per-user history stays
/// in chronological order under lexicographic key sort.
pub struct FirebaseLogger {
    client: Client,
    base_url: String,
}

impl FirebaseLogger {
    pub fn new(base_url: &str) -> Result<Self, LogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LogError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }
}

/// RTDB keys cannot contain `.`, `#`, `$`, `[` or `]`; student ids only ever
/// hit the `.` case.
fn sanitize_key(user_id: &str) -> String {
    user_id.replace('.', "_")
}

#[derive(Serialize)]
struct LogEntry<'a> {
    model_name: &'a str,
    prompt: &'a str,
    response: &'a str,
    interaction_type: &'a str,
    full_timestamp: String,
}

#[async_trait]
impl InteractionLogger for FirebaseLogger {
    async fn record(
        &self,
        user_id: &str,
        model_label: &str,
        prompt: &str,
        response: &str,
        kind: InteractionKind,
    ) -> Result<(), LogError> {
        let now = Local::now();
        let timestamp_key = now.format("%Y%m%d_%H%M%S").to_string();
        let url = format!(
            "{}/logs/{}/{}.json",
            self.base_url,
            sanitize_key(user_id),
            timestamp_key
        );

        let entry = LogEntry {
            model_name: model_label,
            prompt,
            response,
            interaction_type: kind.as_str(),
            full_timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        let resp = self
            .client
            .put(&url)
            .json(&entry)
            .send()
            .await
            .map_err(|e| LogError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LogError::Rejected(status.as_u16()));
        }

        tracing::debug!(user = %sanitize_key(user_id), kind = kind.as_str(), "interaction recorded");
        Ok(())
    }
}

/// Sink used when no log store is configured. Matches the deployed behavior
/// when the database connection could not be established: writes are
/// silently skipped and the chat keeps working.
pub struct DisabledLogger;

#[async_trait]
impl InteractionLogger for DisabledLogger {
    async fn record(
        &self,
        _user_id: &str,
        _model_label: &str,
        _prompt: &str,
        _response: &str,
        kind: InteractionKind,
    ) -> Result<(), LogError> {
        tracing::debug!(kind = kind.as_str(), "log store disabled, record skipped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_dots() {
        assert_eq!(sanitize_key("jane.doe"), "jane_doe");
        assert_eq!(sanitize_key("Thunder"), "Thunder");
    }

    #[test]
    fn interaction_kind_wire_names() {
        assert_eq!(InteractionKind::InitialQuery.as_str(), "INITIAL_QUERY");
        assert_eq!(
            InteractionKind::UnderstoodFeedback.as_str(),
            "UNDERSTOOD_FEEDBACK"
        );
        assert_eq!(
            InteractionKind::ClarificationRequested.as_str(),
            "CLARIFICATION_REQUESTED"
        );
        assert_eq!(
            InteractionKind::ClarificationResponse.as_str(),
            "CLARIFICATION_RESPONSE"
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let logger = FirebaseLogger::new(" https://example.firebaseio.com/ ").unwrap();
        assert_eq!(logger.base_url, "https://example.firebaseio.com");
    }
}
