//! Job Queue Port - Asynchronous marketplace notification jobs.
//!
//! Jobs are idempotent per `(kind, transaction_id)`: enqueueing a job that
//! is already known reports a duplicate instead of queueing it twice.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{JobId, Timestamp, TransactionId};

/// What the marketplace is being told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    PaymentNotify,
    ChargebackNotify,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::PaymentNotify => "payment_notify",
            JobKind::ChargebackNotify => "chargeback_notify",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A queued marketplace notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationJob {
    pub id: JobId,
    pub kind: JobKind,
    pub transaction_id: TransactionId,
    /// Delivery attempts made so far.
    pub attempts: u32,
    pub enqueued_at: Timestamp,
}

impl NotificationJob {
    pub fn new(kind: JobKind, transaction_id: TransactionId) -> Self {
        Self {
            id: JobId::new(),
            kind,
            transaction_id,
            attempts: 0,
            enqueued_at: Timestamp::now(),
        }
    }

    /// Key the queue deduplicates on.
    pub fn dedup_key(&self) -> (JobKind, TransactionId) {
        (self.kind, self.transaction_id.clone())
    }
}

/// Result of an enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    Enqueued(JobId),
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Job queue is closed")]
    Closed,

    #[error("Job queue unavailable: {0}")]
    Unavailable(String),
}

/// Port for enqueueing notification jobs.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Hand a job to the queue without waiting for it to run.
    async fn enqueue(&self, job: NotificationJob) -> Result<EnqueueResult, QueueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_has_no_attempts() {
        let job = NotificationJob::new(JobKind::PaymentNotify, TransactionId::new("T1").unwrap());
        assert_eq!(job.attempts, 0);
        assert_eq!(job.dedup_key(), (JobKind::PaymentNotify, TransactionId::new("T1").unwrap()));
    }

    #[test]
    fn kind_names_match_task_names() {
        assert_eq!(JobKind::PaymentNotify.to_string(), "payment_notify");
        assert_eq!(
            serde_json::to_string(&JobKind::ChargebackNotify).unwrap(),
            "\"chargeback_notify\""
        );
    }
}
