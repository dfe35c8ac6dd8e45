//! Integration tests for marketplace notification delivery.
//!
//! Drives the dispatcher, in-memory queue and worker together:
//! 1. A dispatched notification reaches the marketplace once
//! 2. A failing marketplace is retried, then the job is dead-lettered
//! 3. A notification dispatched during shutdown is dead-lettered or refused

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use webpay::adapters::{InMemoryDeadLetterStore, InMemoryJobQueue, NotificationWorker, RetryPolicy};
use webpay::application::handlers::payment::{DispatchOutcome, NotificationDispatcher};
use webpay::domain::foundation::TransactionId;
use webpay::ports::{DeadLetterStore, JobKind, MarketplaceNotifier, NotificationJob, NotifyError};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Records deliveries; rejects every call while `down` is set.
struct RecordingNotifier {
    down: bool,
    delay: Duration,
    delivered: Mutex<Vec<(JobKind, String)>>,
    calls: Mutex<u32>,
}

impl RecordingNotifier {
    fn new(down: bool) -> Self {
        Self {
            down,
            delay: Duration::ZERO,
            delivered: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(false)
        }
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    fn delivered(&self) -> Vec<(JobKind, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketplaceNotifier for RecordingNotifier {
    async fn notify(&self, job: &NotificationJob) -> Result<(), NotifyError> {
        *self.calls.lock().unwrap() += 1;
        if self.down {
            return Err(NotifyError::Rejected(502));
        }
        tokio::time::sleep(self.delay).await;
        self.delivered
            .lock()
            .unwrap()
            .push((job.kind, job.transaction_id.as_str().to_string()));
        Ok(())
    }
}

async fn wait_for(condition: impl Fn() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

fn tid(value: &str) -> TransactionId {
    TransactionId::new(value).unwrap()
}

struct Pipeline {
    dispatcher: NotificationDispatcher,
    dead_letters: InMemoryDeadLetterStore,
    shutdown: watch::Sender<bool>,
    worker: tokio::task::JoinHandle<()>,
}

impl Pipeline {
    fn start(notifier: Arc<RecordingNotifier>) -> Self {
        let (queue, receiver) = InMemoryJobQueue::new();
        let dead_letters = InMemoryDeadLetterStore::new();
        let worker = NotificationWorker::new(
            receiver,
            notifier,
            Arc::new(dead_letters.clone()),
            RetryPolicy::new(3, Duration::from_millis(5)),
        );
        let (shutdown, shutdown_rx) = watch::channel(false);

        Self {
            dispatcher: NotificationDispatcher::new(Arc::new(queue)),
            dead_letters,
            shutdown,
            worker: tokio::spawn(worker.run(shutdown_rx)),
        }
    }

    async fn stop(self) -> InMemoryDeadLetterStore {
        let _ = self.shutdown.send(true);
        tokio::time::timeout(Duration::from_secs(5), self.worker)
            .await
            .expect("worker should stop")
            .unwrap();
        self.dead_letters
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn dispatched_notifications_are_delivered_once() {
    let notifier = Arc::new(RecordingNotifier::new(false));
    let pipeline = Pipeline::start(notifier.clone());

    let dispatcher = pipeline.dispatcher.clone();
    assert!(matches!(dispatcher.notify(&tid("T1")).await, DispatchOutcome::Enqueued(_)));
    assert_eq!(dispatcher.notify(&tid("T1")).await, DispatchOutcome::Duplicate);
    assert!(matches!(
        dispatcher.notify_chargeback(&tid("T1")).await,
        DispatchOutcome::Enqueued(_)
    ));

    wait_for(|| notifier.delivered().len() == 2).await;
    let dead_letters = pipeline.stop().await;

    let mut delivered = notifier.delivered();
    delivered.sort_by_key(|(kind, _)| kind.as_str());
    assert_eq!(
        delivered,
        vec![
            (JobKind::ChargebackNotify, "T1".to_string()),
            (JobKind::PaymentNotify, "T1".to_string()),
        ]
    );
    assert!(dead_letters.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn failing_marketplace_is_retried_then_dead_lettered() {
    let notifier = Arc::new(RecordingNotifier::new(true));
    let pipeline = Pipeline::start(notifier.clone());
    let dead_letters = pipeline.dead_letters.clone();

    pipeline.dispatcher.notify(&tid("T2")).await;

    for _ in 0..200 {
        if !dead_letters.list().await.unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let dead_letters = pipeline.stop().await;

    assert_eq!(notifier.calls(), 3);
    let letters = dead_letters.list().await.unwrap();
    assert_eq!(letters.len(), 1);
    assert_eq!(letters[0].job.transaction_id.as_str(), "T2");
    assert_eq!(letters[0].job.attempts, 3);
    assert!(letters[0].error.contains("502"));
}

#[tokio::test]
async fn notification_dispatched_during_shutdown_is_not_lost() {
    let notifier = Arc::new(RecordingNotifier::slow(Duration::from_millis(300)));
    let pipeline = Pipeline::start(notifier.clone());
    let dispatcher = pipeline.dispatcher.clone();

    dispatcher.notify(&tid("A")).await;
    wait_for(|| notifier.calls() == 1).await;

    pipeline.shutdown.send(true).unwrap();
    let outcome_b = dispatcher.notify(&tid("B")).await;
    let dead_letters = pipeline.stop().await;

    assert_eq!(notifier.delivered(), vec![(JobKind::PaymentNotify, "A".to_string())]);
    let letters = dead_letters.list().await.unwrap();
    match outcome_b {
        DispatchOutcome::Enqueued(_) => {
            assert_eq!(letters.len(), 1);
            assert_eq!(letters[0].job.transaction_id.as_str(), "B");
            assert_eq!(letters[0].error, "shutdown before delivery");
        }
        DispatchOutcome::Failed => assert!(letters.is_empty()),
        DispatchOutcome::Duplicate => panic!("B was never dispatched before"),
    }
}
