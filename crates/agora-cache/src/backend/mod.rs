//! Key-value cache backends.
//!
//! The cache-aside store never talks to a concrete cache directly: the
//! backend is injected at construction so tests can substitute a fake and
//! deployments can choose between the in-process store and Redis.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::{CacheEntry, MemoryBackend};
#[cfg(feature = "redis")]
pub use redis::RedisBackend;

/// A key-value store for JSON documents with per-key TTL.
///
/// # Implementors
///
/// - `MemoryBackend` - In-process store backed by Moka
/// - `RedisBackend` - Shared Redis instance (feature `redis`)
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored JSON text for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, expiring after `ttl`. Overwrites any
    /// existing entry and resets its expiry.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Removes `key`. Returns whether a live entry was removed; removing an
    /// absent key is not an error.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every key matching a glob pattern and returns how many were
    /// removed.
    async fn delete_pattern(&self, pattern: &str) -> Result<usize>;

    /// Verifies that the backend is reachable.
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the name of this backend, for logging.
    fn name(&self) -> &str;
}
