//! Dead Letter Port - Notifications the worker gave up on.
//!
//! A dead letter is kept until an operator replays or discards it. Stores
//! shared between instances survive restarts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{NotificationJob, QueueError};
use crate::domain::foundation::Timestamp;

/// A job that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetter {
    pub job: NotificationJob,
    /// Last delivery error, or why delivery never started.
    pub error: String,
    pub failed_at: Timestamp,
}

impl DeadLetter {
    pub fn new(job: NotificationJob, error: impl Into<String>) -> Self {
        Self {
            job,
            error: error.into(),
            failed_at: Timestamp::now(),
        }
    }
}

/// Port for recording and listing dead letters.
#[async_trait]
pub trait DeadLetterStore: Send + Sync {
    /// Append a dead letter.
    async fn record(&self, letter: DeadLetter) -> Result<(), QueueError>;

    /// All dead letters, oldest first.
    async fn list(&self) -> Result<Vec<DeadLetter>, QueueError>;
}
