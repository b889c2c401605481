//! services/api/src/adapters/sessions.rs
//!
//! In-memory implementation of the `SessionBinder` port: a lock-guarded map
//! from session identifier to the token bound at last login. Sessions are
//! never explicitly destroyed in this scope.

use async_trait::async_trait;
use book_reviews_core::ports::SessionBinder;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
pub struct InMemorySessionBinder {
    bindings: RwLock<HashMap<String, String>>,
}

impl InMemorySessionBinder {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionBinder for InMemorySessionBinder {
    async fn bind(&self, session_id: &str, token: &str) {
        if let Ok(mut bindings) = self.bindings.write() {
            bindings.insert(session_id.to_string(), token.to_string());
        }
    }

    async fn current_token(&self, session_id: &str) -> Option<String> {
        self.bindings.read().ok()?.get(session_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_session_has_no_token() {
        let binder = InMemorySessionBinder::new();
        assert_eq!(binder.current_token("nope").await, None);
    }

    #[tokio::test]
    async fn rebinding_overwrites_the_previous_token() {
        let binder = InMemorySessionBinder::new();
        binder.bind("sid-1", "token-a").await;
        binder.bind("sid-1", "token-b").await;
        assert_eq!(
            binder.current_token("sid-1").await.as_deref(),
            Some("token-b")
        );
    }
}
