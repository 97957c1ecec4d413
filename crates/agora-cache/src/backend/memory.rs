//! In-process cache backend using Moka.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glob::Pattern;
use metrics::counter;
use moka::Expiry;
use moka::future::Cache;
use tokio::time::Instant;

use super::CacheBackend;
use crate::config::MAX_TTL_SECONDS;
use crate::error::{CacheError, Result};

/// Valor cacheado con su instante de expiracion.
///
/// The expiry is checked against `tokio::time::Instant` on every read, so an
/// entry is never served after `expires_at`, even if Moka has not reclaimed
/// it yet.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: String,
    ttl: Duration,
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates an entry expiring `ttl` from now.
    ///
    /// TTLs are capped at [`MAX_TTL_SECONDS`].
    pub fn new(value: String, ttl: Duration) -> Self {
        let ttl = ttl.min(Duration::from_secs(MAX_TTL_SECONDS));
        Self {
            value,
            ttl,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns true once the expiry instant has been reached.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Per-entry expiry so every key keeps the TTL it was written with.
struct EntryExpiry;

impl Expiry<String, Arc<CacheEntry>> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _created_at: std::time::Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Arc<CacheEntry>,
        _updated_at: std::time::Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache en memoria del proceso.
/// Thread-safe y async-friendly. No capacity bound: entries leave only by
/// TTL expiry or explicit deletion.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use agora_cache::backend::{CacheBackend, MemoryBackend};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), agora_cache::CacheError> {
/// let backend = MemoryBackend::new();
/// backend.set("product:abc", r#"{"name":"Widget"}"#.to_string(), Duration::from_secs(60)).await?;
///
/// if let Some(json) = backend.get("product:abc").await? {
///     println!("Cache hit: {json}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Cache<String, Arc<CacheEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let inner = Cache::builder()
            .expire_after(EntryExpiry)
            .eviction_listener(|_key, _value, cause| {
                let reason = match cause {
                    moka::notification::RemovalCause::Expired => "ttl",
                    moka::notification::RemovalCause::Size => "capacity",
                    moka::notification::RemovalCause::Explicit => "manual",
                    moka::notification::RemovalCause::Replaced => "replaced",
                };
                counter!("agora_cache_evictions_total", "reason" => reason).increment(1);
            })
            .build();

        Self { inner }
    }

    /// Retorna el numero aproximado de entries en cache.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Returns the raw entry for `key`, including expired ones not yet reclaimed.
    pub async fn entry(&self, key: &str) -> Option<Arc<CacheEntry>> {
        self.inner.get(key).await
    }

    /// Fuerza la limpieza de entries expiradas y pendientes.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get(key).await {
            Some(entry) if entry.is_expired() => {
                self.inner.invalidate(key).await;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let entry = Arc::new(CacheEntry::new(value, ttl));
        self.inner.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let removed = self.inner.remove(key).await;
        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize> {
        let matcher = Pattern::new(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        // Recolectar primero; el iterador es una snapshot
        let matched: Vec<Arc<String>> = self
            .inner
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .map(|(key, _)| key)
            .collect();

        let mut count = 0;
        for key in matched {
            if self.delete(&key).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
