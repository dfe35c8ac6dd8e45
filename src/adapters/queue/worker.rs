//! NotificationWorker - Background delivery of marketplace notifications.
//!
//! Consumes jobs from the [`InMemoryJobQueue`](super::InMemoryJobQueue) and
//! hands each to the `MarketplaceNotifier`, retrying failures a fixed number
//! of times with a fixed delay between attempts. Jobs that are not delivered
//! go to the `DeadLetterStore`.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_attempts` | 5 | Delivery attempts before a job is dead-lettered |
//! | `retry_delay` | 300s | Wait between attempts |
//!
//! ## Graceful Shutdown
//!
//! On shutdown the worker closes its receiver, so the queue refuses new jobs.
//! Jobs already queued but not started are dead-lettered. Deliveries in
//! flight finish their current attempt, and a job still waiting for a retry
//! is dead-lettered too.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;

use super::in_memory::JobReceiver;
use crate::ports::{DeadLetter, DeadLetterStore, MarketplaceNotifier, NotificationJob};

/// Retry schedule for notification delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }
}

/// How a job left the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    DeadLettered { attempts: u32 },
}

/// Background service delivering queued notifications.
pub struct NotificationWorker {
    receiver: JobReceiver,
    notifier: Arc<dyn MarketplaceNotifier>,
    dead_letters: Arc<dyn DeadLetterStore>,
    policy: RetryPolicy,
}

impl NotificationWorker {
    pub fn new(
        receiver: JobReceiver,
        notifier: Arc<dyn MarketplaceNotifier>,
        dead_letters: Arc<dyn DeadLetterStore>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            receiver,
            notifier,
            dead_letters,
            policy,
        }
    }

    fn delivery(&self) -> Delivery {
        Delivery {
            notifier: self.notifier.clone(),
            dead_letters: self.dead_letters.clone(),
            policy: self.policy,
        }
    }

    /// Run the worker loop until shutdown signal is received or the queue closes.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut in_flight = JoinSet::new();

        tracing::info!(
            max_attempts = self.policy.max_attempts,
            retry_delay_secs = self.policy.retry_delay.as_secs(),
            "Notification worker started"
        );

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                job = self.receiver.recv() => {
                    let Some(job) = job else { break };
                    let delivery = self.delivery();
                    let shutdown = shutdown.clone();
                    in_flight.spawn(async move { delivery.run(job, shutdown).await });
                }

                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        }

        self.receiver.close();
        let mut unstarted = 0usize;
        while let Some(job) = self.receiver.recv().await {
            unstarted += 1;
            let reason = "shutdown before delivery".to_string();
            record_dead_letter(self.dead_letters.as_ref(), job, reason).await;
        }
        if unstarted > 0 {
            tracing::warn!(jobs = unstarted, "Dead-lettered queued notifications at shutdown");
        }

        while in_flight.join_next().await.is_some() {}
        tracing::info!("Notification worker stopped");
    }

    /// Deliver a single job with retries (for testing without the loop).
    pub async fn process(&self, job: NotificationJob) -> DeliveryOutcome {
        let delivery = self.delivery();
        // Sender kept alive so the delivery never sees a shutdown.
        let (_tx, rx) = watch::channel(false);
        delivery.run(job, rx).await
    }
}

struct Delivery {
    dead_letters: Arc<dyn DeadLetterStore>,
    notifier: Arc<dyn MarketplaceNotifier>,
    policy: RetryPolicy,
}

impl Delivery {
    async fn run(self, mut job: NotificationJob, mut shutdown: watch::Receiver<bool>) -> DeliveryOutcome {
        loop {
            job.attempts += 1;

            let error = match self.notifier.notify(&job).await {
                Ok(()) => {
                    tracing::info!(
                        job_id = %job.id,
                        kind = %job.kind,
                        transaction_id = %job.transaction_id,
                        attempts = job.attempts,
                        "Marketplace notified"
                    );
                    return DeliveryOutcome::Delivered {
                        attempts: job.attempts,
                    };
                }
                Err(e) => e.to_string(),
            };

            if job.attempts >= self.policy.max_attempts {
                tracing::error!(
                    job_id = %job.id,
                    kind = %job.kind,
                    transaction_id = %job.transaction_id,
                    attempts = job.attempts,
                    error = %error,
                    "Marketplace notification failed, giving up"
                );
                let attempts = job.attempts;
                record_dead_letter(self.dead_letters.as_ref(), job, error).await;
                return DeliveryOutcome::DeadLettered { attempts };
            }

            tracing::warn!(
                job_id = %job.id,
                kind = %job.kind,
                transaction_id = %job.transaction_id,
                attempts = job.attempts,
                error = %error,
                "Marketplace notification failed, will retry"
            );

            let interrupted = tokio::select! {
                _ = tokio::time::sleep(self.policy.retry_delay) => false,
                changed = shutdown.changed() => changed.is_ok() && *shutdown.borrow(),
            };
            if interrupted {
                tracing::warn!(job_id = %job.id, "Shutdown during retry wait, dead-lettering job");
                let attempts = job.attempts;
                let reason = format!("shutdown before retry; last error: {}", error);
                record_dead_letter(self.dead_letters.as_ref(), job, reason).await;
                return DeliveryOutcome::DeadLettered { attempts };
            }
        }
    }
}

/// Stores a dead letter. A store failure is logged with the full job so the
/// notification can still be replayed by hand.
async fn record_dead_letter(store: &dyn DeadLetterStore, job: NotificationJob, error: String) {
    let (job_id, kind, transaction_id) = (job.id, job.kind, job.transaction_id.clone());
    if let Err(e) = store.record(DeadLetter::new(job, error.clone())).await {
        tracing::error!(
            job_id = %job_id,
            kind = %kind,
            transaction_id = %transaction_id,
            error = %error,
            store_error = %e,
            "Failed to record dead letter"
        );
    }
}
