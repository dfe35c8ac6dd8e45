//! NotificationDispatcher - Queues marketplace notifications for settled payments.

use std::sync::Arc;

use crate::domain::foundation::{JobId, TransactionId};
use crate::ports::{EnqueueResult, JobKind, JobQueue, NotificationJob};

/// What happened to a notification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new job was queued.
    Enqueued(JobId),
    /// A job for this transaction and kind already exists.
    Duplicate,
    /// The queue refused the job. Already logged.
    Failed,
}

/// Hands notification jobs to the job queue.
///
/// Never fails the caller: the payment has already happened by the time a
/// notification is dispatched, so queue trouble is logged and reported as
/// [`DispatchOutcome::Failed`].
#[derive(Clone)]
pub struct NotificationDispatcher {
    queue: Arc<dyn JobQueue>,
}

impl NotificationDispatcher {
    pub fn new(queue: Arc<dyn JobQueue>) -> Self {
        Self { queue }
    }

    /// Tell the marketplace a payment went through.
    pub async fn notify(&self, transaction_id: &TransactionId) -> DispatchOutcome {
        self.dispatch(JobKind::PaymentNotify, transaction_id).await
    }

    /// Tell the marketplace a payment was charged back.
    pub async fn notify_chargeback(&self, transaction_id: &TransactionId) -> DispatchOutcome {
        self.dispatch(JobKind::ChargebackNotify, transaction_id).await
    }

    async fn dispatch(&self, kind: JobKind, transaction_id: &TransactionId) -> DispatchOutcome {
        let job = NotificationJob::new(kind, transaction_id.clone());

        match self.queue.enqueue(job).await {
            Ok(EnqueueResult::Enqueued(job_id)) => {
                tracing::info!(
                    job_id = %job_id,
                    kind = %kind,
                    transaction_id = %transaction_id,
                    "Queued marketplace notification"
                );
                DispatchOutcome::Enqueued(job_id)
            }
            Ok(EnqueueResult::Duplicate) => {
                tracing::debug!(
                    kind = %kind,
                    transaction_id = %transaction_id,
                    "Notification already queued, skipping"
                );
                DispatchOutcome::Duplicate
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = %kind,
                    transaction_id = %transaction_id,
                    "Failed to queue marketplace notification"
                );
                DispatchOutcome::Failed
            }
        }
    }
}
