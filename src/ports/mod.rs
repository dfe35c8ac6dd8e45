//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - Server-side browser session storage
//! - `ProviderClient` - Payment provider API (notice checks, transaction lookup)
//! - `JobQueue` - Asynchronous marketplace notification jobs
//! - `DeadLetterStore` - Notification jobs that were never delivered
//! - `MarketplaceNotifier` - Delivery of a notification job to the marketplace

mod dead_letter_store;
mod job_queue;
mod marketplace_notifier;
mod provider_client;
mod session_store;

pub use dead_letter_store::{DeadLetter, DeadLetterStore};
pub use job_queue::{EnqueueResult, JobKind, JobQueue, NotificationJob, QueueError};
pub use marketplace_notifier::{MarketplaceNotifier, NotifyError};
pub use provider_client::{
    NoticePayload, NoticeResult, NoticeVerdict, ProviderClient, ProviderClientError,
};
pub use session_store::{SessionStore, SessionStoreError};
