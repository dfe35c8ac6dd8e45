//! In-memory session store for testing and development.
//!
//! Sessions live in a HashMap and never expire. Not suitable for
//! multi-server deployments.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, HashMap<String, Value>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions holding at least one key.
    pub async fn session_count(&self) -> usize {
        self.sessions
            .read()
            .await
            .values()
            .filter(|keys| !keys.is_empty())
            .count()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session: &SessionId, key: &str) -> Result<Option<Value>, SessionStoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session).and_then(|keys| keys.get(key)).cloned())
    }

    async fn set(&self, session: &SessionId, key: &str, value: Value) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session.clone())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, session: &SessionId, key: &str) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if let Some(keys) = sessions.get_mut(session) {
            keys.remove(key);
            if keys.is_empty() {
                sessions.remove(session);
            }
        }
        Ok(())
    }
}
