//! Read-through cache over an injected backend.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use agora_core::{AgoraError, Normalize, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use crate::backend::{CacheBackend, MemoryBackend};
use crate::config::{CacheConfig, MAX_TTL_SECONDS};
use crate::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Cache-aside store.
///
/// Reads consult the backend first and fall back to the caller's fetch on a
/// miss; mutations purge keys through [`CacheAsideStore::invalidate`].
/// Cloning is cheap and clones share the backend and the metrics.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use agora_cache::{CacheAsideStore, CacheKey};
/// use agora_core::EntityKind;
/// use agora_core::model::Product;
///
/// # #[tokio::main]
/// # async fn main() -> agora_core::Result<()> {
/// let store = CacheAsideStore::in_memory();
/// let key = CacheKey::all(EntityKind::Product);
///
/// let products: Option<Vec<Product>> = store
///     .read(&key, Duration::from_secs(60), || async {
///         // Fetch from the primary store (only on a miss)
///         Ok(Some(Vec::new()))
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CacheAsideStore {
    backend: Arc<dyn CacheBackend>,
    metrics: CacheMetrics,
    default_ttl: Duration,
}

impl CacheAsideStore {
    pub fn new(backend: Arc<dyn CacheBackend>, config: &CacheConfig) -> Self {
        Self {
            backend,
            metrics: CacheMetrics::new(),
            default_ttl: config.default_ttl(),
        }
    }

    /// Store over a fresh in-process backend with the default configuration.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()), &CacheConfig::default())
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Returns the value cached under `key`, or fetches, caches and returns it.
    ///
    /// - Hit: the stored value is returned and `fetch` is not called.
    /// - Miss: `fetch` is called exactly once. `Ok(None)` is returned as-is
    ///   and nothing is cached. A value is normalized, stored with expiry
    ///   `now + ttl`, and returned.
    /// - An error from `fetch` is returned unchanged and nothing is cached.
    ///
    /// Backend failures never fail the read: a failed lookup is a miss and
    /// a failed write only loses the cache entry.
    ///
    /// # Errors
    ///
    /// `Validation` if `ttl` is zero or longer than a year; otherwise whatever
    /// `fetch` returns.
    pub async fn read<T, F, Fut>(&self, key: &CacheKey, ttl: Duration, fetch: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Normalize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        check_ttl(ttl)?;

        let start = Instant::now();

        if let Some(cached) = self.lookup::<T>(key).await {
            self.metrics.record_hit();
            self.metrics.record_operation_duration("read_hit", start.elapsed());
            trace!(key = %key, "Cache hit");
            return Ok(Some(cached));
        }

        self.metrics.record_miss();
        self.metrics.record_fetch();
        trace!(key = %key, "Cache miss");

        let Some(mut value) = fetch().await? else {
            self.metrics.record_negative();
            trace!(key = %key, "Fetch returned no result, nothing cached");
            return Ok(None);
        };

        value.normalize();
        self.store(key, &value, ttl).await;
        self.metrics.record_operation_duration("read_miss", start.elapsed());

        Ok(Some(value))
    }

    /// [`read`](Self::read) with the configured default TTL.
    pub async fn read_default<T, F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Normalize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        self.read(key, self.default_ttl, fetch).await
    }

    /// Stores a value known to be current, such as a document just created.
    ///
    /// The stored copy is normalized; `value` itself is left untouched.
    pub async fn populate<T>(&self, key: &CacheKey, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + Normalize + Clone,
    {
        check_ttl(ttl)?;
        let mut normalized = value.clone();
        normalized.normalize();
        self.store(key, &normalized, ttl).await;
        Ok(())
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let raw = match self.backend.get(key.as_str()).await {
            Ok(raw) => raw?,
            Err(e) => {
                self.metrics.record_backend_error("get");
                warn!(
                    key = %key,
                    backend = self.backend.name(),
                    error = %e,
                    "Cache lookup failed, falling back to primary store"
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %key, error = %e, "Value could not be serialized, not cached");
                return;
            }
        };

        match self.backend.set(key.as_str(), json, ttl).await {
            Ok(()) => debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value"),
            Err(e) => {
                self.metrics.record_backend_error("set");
                warn!(
                    key = %key,
                    backend = self.backend.name(),
                    error = %e,
                    "Cache write failed, value served uncached"
                );
            }
        }
    }
}

fn check_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(AgoraError::validation("ttl", "ttl must be greater than zero"));
    }
    if ttl > Duration::from_secs(MAX_TTL_SECONDS) {
        return Err(AgoraError::validation(
            "ttl",
            format!("ttl cannot exceed {MAX_TTL_SECONDS} seconds"),
        ));
    }
    Ok(())
}

impl std::fmt::Debug for CacheAsideStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAsideStore")
            .field("backend", &self.backend.name())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}
