//! Redis-backed session store for production deployments.
//!
//! Each session is a Redis hash `webpay:session:<id>` whose fields hold JSON
//! values. Every write refreshes the hash TTL.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::Value;

use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

const KEY_PREFIX: &str = "webpay:session:";

/// Redis session store shared by every server instance.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn, ttl_secs))
    }
}

fn redis_key(session: &SessionId) -> String {
    format!("{}{}", KEY_PREFIX, session.as_str())
}

fn unavailable(e: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Unavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, session: &SessionId, key: &str) -> Result<Option<Value>, SessionStoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .hget(redis_key(session), key)
            .await
            .map_err(unavailable)?;

        raw.map(|s| {
            serde_json::from_str(&s)
                .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
        })
        .transpose()
    }

    async fn set(&self, session: &SessionId, key: &str, value: Value) -> Result<(), SessionStoreError> {
        let encoded = serde_json::to_string(&value)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;
        let hash = redis_key(session);

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .hset(&hash, key, encoded)
            .ignore()
            .expire(&hash, self.ttl_secs as i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(unavailable)
    }

    async fn delete(&self, session: &SessionId, key: &str) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.clone();
        conn.hdel::<_, _, ()>(redis_key(session), key)
            .await
            .map_err(unavailable)
    }
}
