//! In-memory dead-letter store for testing and development.
//!
//! Letters are lost on restart; production deployments use
//! [`RedisDeadLetterStore`](super::RedisDeadLetterStore).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{DeadLetter, DeadLetterStore, QueueError};

/// In-memory dead-letter list.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeadLetterStore {
    letters: Arc<RwLock<Vec<DeadLetter>>>,
}

impl InMemoryDeadLetterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeadLetterStore for InMemoryDeadLetterStore {
    async fn record(&self, letter: DeadLetter) -> Result<(), QueueError> {
        self.letters.write().await.push(letter);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<DeadLetter>, QueueError> {
        Ok(self.letters.read().await.clone())
    }
}
