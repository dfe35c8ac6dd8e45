//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for provider redirects and callbacks
//! - `session` - Session stores (in-memory, Redis)
//! - `provider_api` - Provider API client (reqwest, mock)
//! - `queue` - In-process notification queue, delivery worker, dead letters
//! - `marketplace` - Marketplace notifier (reqwest)

pub mod http;
pub mod marketplace;
pub mod provider_api;
pub mod queue;
pub mod session;

pub use marketplace::HttpMarketplaceNotifier;
pub use provider_api::{HttpProviderClient, MockProviderClient, ProviderApiConfig};
pub use queue::{
    InMemoryDeadLetterStore, InMemoryJobQueue, NotificationWorker, RedisDeadLetterStore,
    RetryPolicy,
};
pub use session::{InMemorySessionStore, RedisSessionStore};
