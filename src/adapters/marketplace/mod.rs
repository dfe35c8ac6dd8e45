//! Marketplace notifier adapters.

mod http_notifier;

pub use http_notifier::HttpMarketplaceNotifier;
