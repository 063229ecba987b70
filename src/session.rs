//! Session management
//!
//! The conversation store and feedback gate are per-session state; the
//! controller drives them one synchronous pass at a time. Each session sits
//! behind its own async mutex, which serializes user actions and makes
//! `clear` atomic with respect to both the turn store and the gate.

mod controller;
mod state;

pub use controller::{ChatController, ControllerError, ExchangeOutcome};
pub use state::SessionState;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Live sessions keyed by opaque session id
#[derive(Default)]
pub struct SessionMap {
    inner: RwLock<HashMap<String, Arc<Mutex<SessionState>>>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id.
    pub async fn insert(&self, state: SessionState) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.inner
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(state)));
        id
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<SessionState>>> {
        self.inner.read().await.get(id).cloned()
    }

    /// Drop a session; returns whether it existed.
    pub async fn remove(&self, id: &str) -> bool {
        self.inner.write().await.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_get_remove_round_trip() {
        let map = SessionMap::new();
        let id = map.insert(SessionState::new("u", "m", "s")).await;

        let session = map.get(&id).await.expect("session should exist");
        assert_eq!(session.lock().await.user_id, "u");

        assert!(map.remove(&id).await);
        assert!(map.get(&id).await.is_none());
        assert!(!map.remove(&id).await);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let map = SessionMap::new();
        let a = map.insert(SessionState::new("u", "m", "s")).await;
        let b = map.insert(SessionState::new("u", "m", "s")).await;
        assert_ne!(a, b);
    }
}
