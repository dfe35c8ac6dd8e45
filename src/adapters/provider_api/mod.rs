//! Provider API adapters.
//!
//! Implements the `ProviderClient` port:
//! - `HttpProviderClient` - reqwest client against the provider API
//! - `MockProviderClient` - Configurable in-process double for tests

mod http_client;
mod mock_client;

pub use http_client::{HttpProviderClient, ProviderApiConfig};
pub use mock_client::{MethodCall, MockProviderClient};
