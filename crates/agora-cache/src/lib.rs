//! Agora Cache - read-through cache with write invalidation
//!
//! Query results are cached under deterministic keys (`<entity>:<id>` and
//! `<entity>:all`) with a fixed TTL. Every write to the primary store purges
//! the keys it may have made stale, as listed by its [`InvalidationSet`].
//!
//! The backend is injected as an `Arc<dyn CacheBackend>`: [`MemoryBackend`]
//! runs in process, `RedisBackend` (feature `redis`) shares a Redis instance.

pub mod backend;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod keys;
pub mod metrics;
pub mod policy;
pub mod store;

pub use backend::{CacheBackend, MemoryBackend};
#[cfg(feature = "redis")]
pub use backend::RedisBackend;
pub use config::{BackendKind, CacheConfig};
pub use error::CacheError;
pub use invalidation::InvalidationReport;
pub use keys::{CacheKey, KeyScope};
pub use metrics::{CacheMetrics, register_cache_metrics};
pub use policy::{InvalidationSet, Mutation, MutationKind};
pub use store::CacheAsideStore;
