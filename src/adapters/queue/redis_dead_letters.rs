//! Redis-backed dead-letter store.
//!
//! Letters are JSON entries appended to the list `webpay:dead_letters`. The
//! list has no TTL: entries stay until an operator removes them.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::ports::{DeadLetter, DeadLetterStore, QueueError};

const DEAD_LETTER_KEY: &str = "webpay:dead_letters";

/// Dead-letter list shared by every server instance.
#[derive(Clone)]
pub struct RedisDeadLetterStore {
    conn: MultiplexedConnection,
}

impl RedisDeadLetterStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, QueueError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn))
    }
}

fn unavailable(e: redis::RedisError) -> QueueError {
    QueueError::Unavailable(e.to_string())
}

fn encode(letter: &DeadLetter) -> Result<String, QueueError> {
    serde_json::to_string(letter).map_err(|e| QueueError::Unavailable(e.to_string()))
}

fn decode(raw: &str) -> Result<DeadLetter, QueueError> {
    serde_json::from_str(raw).map_err(|e| QueueError::Unavailable(e.to_string()))
}

#[async_trait]
impl DeadLetterStore for RedisDeadLetterStore {
    async fn record(&self, letter: DeadLetter) -> Result<(), QueueError> {
        let encoded = encode(&letter)?;
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(DEAD_LETTER_KEY, encoded)
            .await
            .map_err(unavailable)
    }

    async fn list(&self) -> Result<Vec<DeadLetter>, QueueError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn
            .lrange(DEAD_LETTER_KEY, 0, -1)
            .await
            .map_err(unavailable)?;
        raw.iter().map(|entry| decode(entry)).collect()
    }
}
