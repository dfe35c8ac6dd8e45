//! Session Store Port - Server-side storage for browser sessions.
//!
//! Values are JSON, keyed by session id and a session key such as
//! `trans_id`. Adapters decide expiry.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session backend unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize session value: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session value: {0}")]
    DeserializationFailed(String),
}

/// Port for per-session key/value storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when the session or key does not exist
    async fn get(&self, session: &SessionId, key: &str) -> Result<Option<Value>, SessionStoreError>;

    /// Write a value, creating the session if needed
    async fn set(&self, session: &SessionId, key: &str, value: Value) -> Result<(), SessionStoreError>;

    /// Remove a key. Removing a missing key is not an error.
    async fn delete(&self, session: &SessionId, key: &str) -> Result<(), SessionStoreError>;
}
