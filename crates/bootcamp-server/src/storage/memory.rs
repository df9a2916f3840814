//! In-memory key-value store using DashMap

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::cache::KeyValueStore;

/// In-process store with the same semantics the gateway expects from Redis:
/// flat namespace, last write wins, no TTL.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store whose every operation fails, for exercising error paths.
#[cfg(test)]
pub(crate) struct FailingStore {
    message: &'static str,
    answers_ping: bool,
}

#[cfg(test)]
impl FailingStore {
    /// Passes the liveness check, then fails reads and writes.
    pub(crate) fn broken_after_startup(message: &'static str) -> Self {
        Self {
            message,
            answers_ping: true,
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            message: "Connection refused",
            answers_ping: false,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl KeyValueStore for FailingStore {
    async fn ping(&self) -> Result<()> {
        if self.answers_ping {
            Ok(())
        } else {
            anyhow::bail!(self.message)
        }
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!(self.message)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!(self.message)
    }
}
