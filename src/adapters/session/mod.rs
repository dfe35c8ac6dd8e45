//! Session store adapters.
//!
//! - `InMemorySessionStore` - Single-process store for tests and development
//! - `RedisSessionStore` - Shared store with expiry for production

mod in_memory;
mod redis;

pub use self::redis::RedisSessionStore;
pub use in_memory::InMemorySessionStore;
