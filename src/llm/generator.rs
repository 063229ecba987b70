//! Response generation with one-shot fallback
//!
//! The primary provider answers every turn. When it fails with an
//! upstream-unavailability signature, the same history is replayed once
//! against the secondary provider. Every failure path collapses into a
//! returned string, so the caller always has something to display and log.

use super::models::{FALLBACK_MODEL_ID, SAMPLING_TEMPERATURE};
use super::types::Turn;
use super::{ChatCompleteApi, GenerateApi, ModelDef};
use std::sync::Arc;
use std::time::Instant;

/// Upstream-unavailability signature. A substring probe on the failure text
/// matches what the deployed service keyed on; a structured status from the
/// provider would be sturdier.
fn is_unavailable(message: &str) -> bool {
    message.contains("502") || message.contains("Bad Gateway")
}

/// Stateless generation routine over an injected provider pair.
pub struct ResponseGenerator {
    primary: Arc<dyn GenerateApi>,
    fallback: Arc<dyn ChatCompleteApi>,
}

impl ResponseGenerator {
    pub fn new(primary: Arc<dyn GenerateApi>, fallback: Arc<dyn ChatCompleteApi>) -> Self {
        Self { primary, fallback }
    }

    /// Produce the next assistant turn for `history`. Performs at most two
    /// outbound calls and never errors past this boundary: provider failures
    /// come back as diagnostic reply text.
    pub async fn generate(
        &self,
        model: &ModelDef,
        history: &[Turn],
        system_instruction: &str,
    ) -> String {
        let start = Instant::now();
        let primary_result = self
            .primary
            .generate_text(
                model.primary_id,
                history,
                SAMPLING_TEMPERATURE,
                system_instruction,
            )
            .await;

        let primary_err = match primary_result {
            Ok(text) => {
                tracing::info!(
                    model = model.label,
                    duration_ms = %start.elapsed().as_millis(),
                    turns = history.len(),
                    "primary provider completed"
                );
                return text;
            }
            Err(e) => e,
        };

        let primary_msg = primary_err.to_string();
        if !is_unavailable(&primary_msg) {
            tracing::error!(
                model = model.label,
                kind = primary_err.kind.as_str(),
                error = %primary_msg,
                "primary provider failed, no fallback for this failure class"
            );
            return format!("Error: {primary_msg}");
        }

        tracing::warn!(
            model = model.label,
            error = %primary_msg,
            "primary provider unavailable, switching to fallback"
        );

        match self
            .fallback
            .chat_complete(
                FALLBACK_MODEL_ID,
                system_instruction,
                history,
                SAMPLING_TEMPERATURE,
            )
            .await
        {
            Ok(text) => {
                tracing::info!(
                    model = FALLBACK_MODEL_ID,
                    duration_ms = %start.elapsed().as_millis(),
                    "fallback provider completed"
                );
                text
            }
            Err(fallback_err) => {
                tracing::error!(
                    kind = fallback_err.kind.as_str(),
                    error = %fallback_err,
                    "fallback provider failed"
                );
                format!("Both models failed. Gemini Error: {primary_msg} | OpenAI Error: {fallback_err}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::LlmError;
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_model() -> &'static ModelDef {
        super::super::resolve("gemini-3-pro-preview").unwrap()
    }

    struct FakePrimary {
        result: Result<String, (super::super::LlmErrorKind, String)>,
        calls: AtomicUsize,
    }

    impl FakePrimary {
        fn ok(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(kind: super::super::LlmErrorKind, message: &str) -> Self {
            Self {
                result: Err((kind, message.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerateApi for FakePrimary {
        async fn generate_text(
            &self,
            _model_id: &str,
            _history: &[Turn],
            _temperature: f32,
            _system_instruction: &str,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(|(kind, message)| LlmError::new(kind, message))
        }
    }

    struct FakeFallback {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    impl FakeFallback {
        fn ok(text: &str) -> Self {
            Self {
                result: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatCompleteApi for FakeFallback {
        async fn chat_complete(
            &self,
            _model_id: &str,
            _system_instruction: &str,
            _history: &[Turn],
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().map_err(LlmError::server_error)
        }
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = Arc::new(FakePrimary::ok("the answer"));
        let fallback = Arc::new(FakeFallback::ok("unused"));
        let generator = ResponseGenerator::new(primary.clone(), fallback.clone());

        let reply = generator
            .generate(test_model(), &[Turn::user("q")], "sys")
            .await;

        assert_eq!(reply, "the answer");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn unavailability_triggers_single_fallback() {
        let primary = Arc::new(FakePrimary::err(
            super::super::LlmErrorKind::ServerError,
            "Server error (HTTP 502 Bad Gateway): upstream down",
        ));
        let fallback = Arc::new(FakeFallback::ok("fallback answer"));
        let generator = ResponseGenerator::new(primary.clone(), fallback.clone());

        let reply = generator
            .generate(test_model(), &[Turn::user("q")], "sys")
            .await;

        assert_eq!(reply, "fallback answer");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn bad_gateway_text_alone_triggers_fallback() {
        let primary = Arc::new(FakePrimary::err(
            super::super::LlmErrorKind::Unknown,
            "upstream said: Bad Gateway",
        ));
        let fallback = Arc::new(FakeFallback::ok("ok"));
        let generator = ResponseGenerator::new(primary, fallback.clone());

        let reply = generator
            .generate(test_model(), &[Turn::user("q")], "sys")
            .await;

        assert_eq!(reply, "ok");
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn double_failure_reports_both_descriptions_in_order() {
        let primary = Arc::new(FakePrimary::err(
            super::super::LlmErrorKind::ServerError,
            "Server error (HTTP 502 Bad Gateway): boom",
        ));
        let fallback = Arc::new(FakeFallback::err("quota exhausted"));
        let generator = ResponseGenerator::new(primary, fallback);

        let reply = generator
            .generate(test_model(), &[Turn::user("q")], "sys")
            .await;

        let primary_pos = reply.find("HTTP 502 Bad Gateway").unwrap();
        let fallback_pos = reply.find("quota exhausted").unwrap();
        assert!(primary_pos < fallback_pos);
        assert!(reply.starts_with("Both models failed."));
    }

    #[tokio::test]
    async fn other_failures_surface_without_fallback() {
        let primary = Arc::new(FakePrimary::err(
            super::super::LlmErrorKind::RateLimit,
            "Rate limit exceeded: slow down",
        ));
        let fallback = Arc::new(FakeFallback::ok("unused"));
        let generator = ResponseGenerator::new(primary, fallback.clone());

        let reply = generator
            .generate(test_model(), &[Turn::user("q")], "sys")
            .await;

        assert_eq!(reply, "Error: Rate limit exceeded: slow down");
        assert_eq!(fallback.call_count(), 0);
    }

    #[test]
    fn unavailability_signature() {
        assert!(is_unavailable("HTTP 502 error"));
        assert!(is_unavailable("upstream Bad Gateway"));
        assert!(!is_unavailable("HTTP 503 error"));
        assert!(!is_unavailable("bad gateway")); // match is case-sensitive
    }
}
