//! Marketplace notifier port.
//!
//! Consumer side of the job queue: delivers one notification job to the
//! marketplace that started the purchase.

use async_trait::async_trait;

use super::NotificationJob;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("Marketplace did not answer in time")]
    Timeout,

    #[error("Marketplace unreachable: {0}")]
    Connection(String),

    #[error("Marketplace rejected notification with status {0}")]
    Rejected(u16),
}

/// Port for delivering notifications to the marketplace.
#[async_trait]
pub trait MarketplaceNotifier: Send + Sync {
    /// Deliver one job. Any error is retried by the worker.
    async fn notify(&self, job: &NotificationJob) -> Result<(), NotifyError>;
}
