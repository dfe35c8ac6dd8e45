//! Job queue adapters.
//!
//! - `InMemoryJobQueue` - Deduplicating in-process queue implementing `JobQueue`
//! - `NotificationWorker` - Consumer delivering jobs through `MarketplaceNotifier`
//! - `InMemoryDeadLetterStore` / `RedisDeadLetterStore` - Undelivered jobs

mod dead_letters;
mod in_memory;
mod redis_dead_letters;
mod worker;

pub use dead_letters::InMemoryDeadLetterStore;
pub use in_memory::{InMemoryJobQueue, JobReceiver};
pub use redis_dead_letters::RedisDeadLetterStore;
pub use worker::{DeliveryOutcome, NotificationWorker, RetryPolicy};
