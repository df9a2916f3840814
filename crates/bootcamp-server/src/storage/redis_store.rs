//! Redis-backed key-value store

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::cache::KeyValueStore;

/// Redis host, fixed for the deployment this service runs in.
pub const REDIS_HOST: &str = "redis";
pub const REDIS_PORT: u16 = 6379;

/// Single multiplexed connection, opened once. It is never re-established:
/// after a drop, commands fail until the process restarts.
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let url = format!("redis://{}:{}/", host, port);
        let client = redis::Client::open(url.as_str())
            .with_context(|| format!("Invalid Redis URL: {}", url))?;

        // One attempt, no backoff
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .with_context(|| format!("Failed to connect to Redis at {}:{}", host, port))?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn ping(&self) -> Result<()> {
        // Clones share the underlying connection
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }
}
