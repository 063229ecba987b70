//! Chat and feedback control flow
//!
//! Drives the two-state feedback gate over a session's conversation store:
//! OPEN accepts new prompts, PENDING blocks them until the last assistant
//! reply is resolved. Negative feedback synthesizes a clarification turn and
//! re-invokes the generator on the extended history.

use crate::llm::{self, ResponseGenerator, Turn};
use crate::logging::{InteractionKind, InteractionLogger};
use crate::session::SessionState;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced to the shell; provider failures are NOT among them, they
/// come back as reply text.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("feedback on the last reply is still pending")]
    FeedbackPending,
    #[error("no completed exchange to resolve feedback on")]
    NothingToResolve,
    #[error("unknown model label: {0}")]
    UnknownModel(String),
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

/// Outcome of one user action: the assistant reply it produced (if any) plus
/// non-fatal notices for the shell to surface.
#[derive(Debug)]
pub struct ExchangeOutcome {
    pub reply: Option<String>,
    pub warnings: Vec<String>,
}

/// Stateless driver over per-session state. The generator and logger are
/// shared across sessions; all mutable state lives in [`SessionState`].
pub struct ChatController {
    generator: Arc<ResponseGenerator>,
    logger: Arc<dyn InteractionLogger>,
}

impl ChatController {
    pub fn new(generator: Arc<ResponseGenerator>, logger: Arc<dyn InteractionLogger>) -> Self {
        Self { generator, logger }
    }

    /// Accept a new prompt: append it, generate the reply, append that, log
    /// the exchange, and close the feedback gate.
    pub async fn submit_prompt(
        &self,
        state: &mut SessionState,
        prompt: &str,
    ) -> Result<ExchangeOutcome, ControllerError> {
        if state.feedback_pending() {
            return Err(ControllerError::FeedbackPending);
        }
        if prompt.trim().is_empty() {
            return Err(ControllerError::EmptyPrompt);
        }
        let model = llm::resolve(&state.model_label)
            .ok_or_else(|| ControllerError::UnknownModel(state.model_label.clone()))?;

        state.push(Turn::user(prompt));
        let reply = self
            .generator
            .generate(model, state.turns(), &state.system_instruction)
            .await;
        state.push(Turn::assistant(reply.clone()));

        let mut warnings = Vec::new();
        self.record_or_warn(
            &mut warnings,
            state,
            prompt,
            &reply,
            InteractionKind::InitialQuery,
        )
        .await;

        state.set_feedback_pending(true);

        Ok(ExchangeOutcome {
            reply: Some(reply),
            warnings,
        })
    }

    /// Resolve the pending feedback on the last assistant reply.
    ///
    /// `understood = true` opens the gate with a single log record.
    /// `understood = false` keeps the gate closed, appends a synthetic
    /// clarification request plus the generator's reply to it, and logs both
    /// halves of that follow-up exchange.
    ///
    /// The feedback records deliberately carry the assistant's previous
    /// reply in the prompt field, matching what the deployed service wrote.
    pub async fn resolve_feedback(
        &self,
        state: &mut SessionState,
        understood: bool,
    ) -> Result<ExchangeOutcome, ControllerError> {
        if !state.feedback_pending() || state.turns().len() < 2 {
            return Err(ControllerError::NothingToResolve);
        }
        let last_reply = state
            .last_assistant_reply()
            .ok_or(ControllerError::NothingToResolve)?
            .to_string();

        let mut warnings = Vec::new();

        if understood {
            self.record_or_warn(
                &mut warnings,
                state,
                &last_reply,
                "",
                InteractionKind::UnderstoodFeedback,
            )
            .await;
            state.set_feedback_pending(false);
            return Ok(ExchangeOutcome {
                reply: None,
                warnings,
            });
        }

        let model = llm::resolve(&state.model_label)
            .ok_or_else(|| ControllerError::UnknownModel(state.model_label.clone()))?;

        self.record_or_warn(
            &mut warnings,
            state,
            &last_reply,
            "",
            InteractionKind::ClarificationRequested,
        )
        .await;

        let clarification = format!(
            "I don't understand the previous explanation: '{last_reply}'. Please break it down further."
        );
        state.push(Turn::user(clarification.clone()));

        let reply = self
            .generator
            .generate(model, state.turns(), &state.system_instruction)
            .await;
        state.push(Turn::assistant(reply.clone()));

        self.record_or_warn(
            &mut warnings,
            state,
            &clarification,
            &reply,
            InteractionKind::ClarificationResponse,
        )
        .await;

        // Gate stays closed: the user judges the clarification reply too.
        state.set_feedback_pending(true);

        Ok(ExchangeOutcome {
            reply: Some(reply),
            warnings,
        })
    }

    async fn record_or_warn(
        &self,
        warnings: &mut Vec<String>,
        state: &SessionState,
        prompt: &str,
        response: &str,
        kind: InteractionKind,
    ) {
        if let Err(e) = self
            .logger
            .record(&state.user_id, &state.model_label, prompt, response, kind)
            .await
        {
            tracing::warn!(kind = kind.as_str(), error = %e, "interaction log write failed");
            warnings.push(format!("Logging error: {e}"));
        }
    }
}
