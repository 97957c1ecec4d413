#![allow(dead_code)]
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use agora_cache::backend::{CacheBackend, MemoryBackend};
use agora_cache::error::{CacheError, Result as CacheResult};
use agora_cache::{CacheAsideStore, CacheConfig};
use agora_core::model::Product;
use agora_core::{AgoraError, Result};
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

pub const TTL: Duration = Duration::from_secs(60);

/// Routes `tracing` output to the test harness; `RUST_LOG` overrides the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Helper to decode a Product from a JSON string slice.
/// Panics if the JSON is invalid (intended for tests).
pub fn product_from_json(json: &str) -> Product {
    serde_json::from_str(json).expect("Failed to create test product from JSON")
}

/// Product `abc` named Widget, listed at 15:04:05 UTC.
pub fn widget() -> Product {
    product_from_json(
        r#"{
            "_id": "abc",
            "name": "Widget",
            "price": 12.0,
            "date": "2024-09-01T15:04:05Z",
            "description": "A widget",
            "condition": "good",
            "seller_id": "seller-1",
            "category": "other"
        }"#,
    )
}

/// Counts how many times the primary store was queried.
#[derive(Debug, Clone, Default)]
pub struct FetchCounter {
    calls: Arc<AtomicUsize>,
}

impl FetchCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns a fetch closure that yields `value` and counts the call.
    pub fn returning<T: Send + 'static>(
        &self,
        value: Option<T>,
    ) -> impl FnOnce() -> std::future::Ready<Result<Option<T>>> {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value))
        }
    }

    /// Returns a fetch closure that fails with `error` and counts the call.
    pub fn failing<T>(
        &self,
        error: AgoraError,
    ) -> impl FnOnce() -> std::future::Ready<Result<Option<T>>> {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Err(error))
        }
    }
}

/// Backend whose operations can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyBackend {
    inner: MemoryBackend,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool) -> CacheResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(CacheError::ConnectionFailed("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheBackend for FlakyBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        Self::check(&self.fail_writes)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Self::check(&self.fail_deletes)?;
        self.inner.delete(key).await
    }

    async fn delete_pattern(&self, pattern: &str) -> CacheResult<usize> {
        Self::check(&self.fail_deletes)?;
        self.inner.delete_pattern(pattern).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// Store over a flaky backend, returning both.
pub fn flaky_store() -> (CacheAsideStore, Arc<FlakyBackend>) {
    let backend = FlakyBackend::new();
    let store = CacheAsideStore::new(backend.clone(), &CacheConfig::default());
    (store, backend)
}
