//! Cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("agora_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("agora_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "agora_cache_fetches_total",
        "Total number of primary store fetches issued on a miss"
    );
    metrics::describe_counter!(
        "agora_cache_negative_results_total",
        "Total number of fetches that returned not-found"
    );
    metrics::describe_counter!(
        "agora_cache_invalidations_total",
        "Total number of cache keys invalidated"
    );
    metrics::describe_counter!(
        "agora_cache_backend_errors_total",
        "Total number of failed cache backend operations"
    );
    metrics::describe_counter!(
        "agora_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_histogram!(
        "agora_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    negatives: AtomicU64,
    invalidations: AtomicU64,
    backend_errors: AtomicU64,
}

/// Recorder de metricas de cache.
/// Los counters internos son por instancia; los del crate `metrics` son globales.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    counters: Arc<Counters>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un cache hit
    pub fn record_hit(&self) {
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        counter!("agora_cache_hits_total").increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self) {
        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        counter!("agora_cache_misses_total").increment(1);
    }

    /// Registra una consulta al primary store
    pub fn record_fetch(&self) {
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        counter!("agora_cache_fetches_total").increment(1);
    }

    /// Registra un fetch sin resultado (no se cachea)
    pub fn record_negative(&self) {
        self.counters.negatives.fetch_add(1, Ordering::Relaxed);
        counter!("agora_cache_negative_results_total").increment(1);
    }

    /// Registra keys invalidadas
    pub fn record_invalidation(&self, keys: u64) {
        self.counters.invalidations.fetch_add(keys, Ordering::Relaxed);
        counter!("agora_cache_invalidations_total").increment(keys);
    }

    /// Registra un fallo del backend
    pub fn record_backend_error(&self, operation: &'static str) {
        self.counters.backend_errors.fetch_add(1, Ordering::Relaxed);
        counter!("agora_cache_backend_errors_total", "operation" => operation).increment(1);
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("agora_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let misses = self.misses() as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.counters.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.counters.misses.load(Ordering::Relaxed)
    }

    pub fn fetches(&self) -> u64 {
        self.counters.fetches.load(Ordering::Relaxed)
    }

    pub fn negative_results(&self) -> u64 {
        self.counters.negatives.load(Ordering::Relaxed)
    }

    pub fn invalidations(&self) -> u64 {
        self.counters.invalidations.load(Ordering::Relaxed)
    }

    pub fn backend_errors(&self) -> u64 {
        self.counters.backend_errors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_metrics_hit_rate() {
        let metrics = CacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();

        assert!((metrics.hit_rate() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = CacheMetrics::new();
        let clone = metrics.clone();

        clone.record_fetch();
        clone.record_negative();
        clone.record_invalidation(2);
        clone.record_backend_error("get");

        assert_eq!(metrics.fetches(), 1);
        assert_eq!(metrics.negative_results(), 1);
        assert_eq!(metrics.invalidations(), 2);
        assert_eq!(metrics.backend_errors(), 1);
    }

    #[test]
    fn test_instances_are_independent() {
        let a = CacheMetrics::new();
        let b = CacheMetrics::new();
        a.record_hit();
        assert_eq!(a.hits(), 1);
        assert_eq!(b.hits(), 0);
    }
}
