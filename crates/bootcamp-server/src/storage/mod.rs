//! Storage layer
//!
//! Notes live in a relational table reached through sqlx's `Any` driver.
//! The cache is a pass-through to Redis, with an in-process DashMap store
//! implementing the same contract.

pub mod cache;
pub mod db;
pub mod memory;
pub mod redis_store;

pub use cache::{CacheClient, KeyValueStore};
pub use db::{Database, Note};
pub use memory::MemoryStore;
pub use redis_store::{REDIS_HOST, REDIS_PORT};
