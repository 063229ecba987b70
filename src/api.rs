//! HTTP API for the assistant backend
//!
//! The presentation layer lives elsewhere; this module is the shell
//! boundary it talks to.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::auth::AllowList;
use crate::session::{ChatController, SessionMap};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionMap>,
    pub controller: Arc<ChatController>,
    pub allow_list: Arc<AllowList>,
    pub default_model_label: Arc<str>,
    pub default_system_instruction: Arc<str>,
}

impl AppState {
    pub fn new(
        controller: ChatController,
        allow_list: AllowList,
        default_model_label: &str,
        default_system_instruction: &str,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionMap::new()),
            controller: Arc::new(controller),
            allow_list: Arc::new(allow_list),
            default_model_label: Arc::from(default_model_label),
            default_system_instruction: Arc::from(default_system_instruction),
        }
    }
}
