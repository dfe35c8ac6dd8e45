//! In-process job queue.
//!
//! Jobs travel over an unbounded tokio channel to a [`NotificationWorker`].
//! The queue remembers every `(kind, transaction_id)` it has accepted. Once
//! the worker closes its receiver, further jobs are refused.
//!
//! [`NotificationWorker`]: super::NotificationWorker

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::TransactionId;
use crate::ports::{EnqueueResult, JobKind, JobQueue, NotificationJob, QueueError};

#[derive(Debug, Default)]
struct QueueState {
    accepted: HashSet<(JobKind, TransactionId)>,
}

/// Receiving half handed to the worker.
pub type JobReceiver = mpsc::UnboundedReceiver<NotificationJob>;

/// In-process job queue with deduplication.
#[derive(Debug, Clone)]
pub struct InMemoryJobQueue {
    sender: mpsc::UnboundedSender<NotificationJob>,
    state: Arc<RwLock<QueueState>>,
}

impl InMemoryJobQueue {
    /// Creates the queue and the receiver its worker consumes.
    pub fn new() -> (Self, JobReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let queue = Self {
            sender,
            state: Arc::new(RwLock::new(QueueState::default())),
        };
        (queue, receiver)
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: NotificationJob) -> Result<EnqueueResult, QueueError> {
        let key = job.dedup_key();
        let job_id = job.id;

        let mut state = self.state.write().await;
        if !state.accepted.insert(key.clone()) {
            return Ok(EnqueueResult::Duplicate);
        }
        if self.sender.send(job).is_err() {
            state.accepted.remove(&key);
            return Err(QueueError::Closed);
        }
        Ok(EnqueueResult::Enqueued(job_id))
    }
}
