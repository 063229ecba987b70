//! Per-session conversation state

use crate::llm::{Role, Turn};

/// Mutable state owned by one authenticated session: the ordered turn
/// sequence plus the feedback gate over it. One instance per active user
/// session, never shared across users.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub user_id: String,
    pub model_label: String,
    pub system_instruction: String,
    turns: Vec<Turn>,
    feedback_pending: bool,
}

impl SessionState {
    pub fn new(
        user_id: impl Into<String>,
        model_label: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            model_label: model_label.into(),
            system_instruction: system_instruction.into(),
            turns: Vec::new(),
            feedback_pending: false,
        }
    }

    /// Full turn sequence, insertion order = conversational order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Whether the feedback gate is closed (awaiting resolution of the last
    /// assistant turn). New prompts are accepted only when this is false.
    pub fn feedback_pending(&self) -> bool {
        self.feedback_pending
    }

    pub(crate) fn set_feedback_pending(&mut self, pending: bool) {
        self.feedback_pending = pending;
    }

    /// Content of the most recent assistant turn, if the conversation ends
    /// on one.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::Assistant => Some(turn.content.as_str()),
            _ => None,
        }
    }

    /// Empty the store and re-open the feedback gate in one step. Callers
    /// hold the session lock for the whole call, so no observer can see an
    /// empty store with the gate still closed.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.feedback_pending = false;
    }
}
