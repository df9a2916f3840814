//! Cache client with an explicit availability state

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use super::redis_store::RedisStore;

/// Contract every key-value backend implements.
///
/// Values are plain strings and writes overwrite. Expiry and eviction belong
/// to the backend, not to this service.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Round-trip to the backend, used as the startup liveness check.
    async fn ping(&self) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Cache handle held by the application state.
///
/// Availability is decided once at startup and never re-evaluated; a store
/// that goes away later surfaces as per-request errors instead.
#[derive(Clone)]
pub enum CacheClient {
    Available(Arc<dyn KeyValueStore>),
    Unavailable,
}

impl CacheClient {
    /// Connect to Redis and PING it once. Any failure degrades to `Unavailable`.
    pub async fn connect(host: &str, port: u16) -> Self {
        info!("Connecting to Redis at {}:{}...", host, port);
        match RedisStore::connect(host, port).await {
            Ok(store) => Self::check(Arc::new(store)).await,
            Err(e) => {
                warn!("Redis not available, cache endpoints disabled: {:#}", e);
                Self::Unavailable
            }
        }
    }

    /// Run the liveness check against an already constructed store.
    pub async fn check(store: Arc<dyn KeyValueStore>) -> Self {
        match store.ping().await {
            Ok(()) => {
                info!("Cache store is available");
                Self::Available(store)
            }
            Err(e) => {
                warn!("Cache liveness check failed, cache endpoints disabled: {:#}", e);
                Self::Unavailable
            }
        }
    }

    pub fn store(&self) -> Option<&Arc<dyn KeyValueStore>> {
        match self {
            Self::Available(store) => Some(store),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{FailingStore, MemoryStore};
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_check_reachable_store() {
        let client = CacheClient::check(Arc::new(MemoryStore::new())).await;
        assert!(client.is_available());
        assert!(client.store().is_some());
    }

    #[tokio::test]
    async fn test_check_unreachable_store() {
        let client = CacheClient::check(Arc::new(FailingStore::unreachable())).await;
        assert!(!client.is_available());
        assert!(client.store().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_redis_degrades_without_retrying() {
        // Nothing listens on port 1 of the loopback interface.
        let started = Instant::now();
        let client = CacheClient::connect("127.0.0.1", 1).await;

        assert!(!client.is_available());
        assert!(
            started.elapsed() < Duration::from_secs(1),
            "degrading took {:?}",
            started.elapsed()
        );
    }
}
