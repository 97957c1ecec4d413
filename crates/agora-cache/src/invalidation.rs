//! Key invalidation after primary-store writes.

use std::time::Instant;

use agora_core::{EntityKind, Result};
use tracing::{debug, info, warn};

use crate::keys::CacheKey;
use crate::policy::{InvalidationSet, Mutation};
use crate::store::CacheAsideStore;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Keys solicitadas.
    pub requested: usize,
    /// Entries vivas efectivamente eliminadas.
    pub removed: usize,
    /// Keys cuyo delete falló en el backend.
    pub failed: Vec<CacheKey>,
}

impl InvalidationReport {
    /// True when every requested key was handled by the backend.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl CacheAsideStore {
    /// Elimina las entries de `keys`.
    ///
    /// Absent keys are a no-op. A backend failure on one key is logged and
    /// reported but does not stop the remaining deletions, and is never
    /// returned as an error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use agora_cache::{CacheAsideStore, Mutation};
    /// # use agora_core::{DocumentId, EntityKind};
    /// # #[tokio::main]
    /// # async fn main() -> agora_core::Result<()> {
    /// # let store = CacheAsideStore::in_memory();
    /// let edit = Mutation::update(EntityKind::Product, DocumentId::new("abc"));
    /// let report = store.invalidate(&edit.invalidation_set()?).await;
    /// println!("Invalidated {} entries", report.removed);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn invalidate(&self, keys: &InvalidationSet) -> InvalidationReport {
        let start = Instant::now();
        let mut report = InvalidationReport {
            requested: keys.len(),
            ..InvalidationReport::default()
        };

        for key in keys {
            match self.backend().delete(key.as_str()).await {
                Ok(true) => report.removed += 1,
                Ok(false) => {}
                Err(e) => {
                    self.metrics().record_backend_error("delete");
                    warn!(
                        key = %key,
                        backend = self.backend().name(),
                        error = %e,
                        "Cache invalidation failed, entry expires by TTL"
                    );
                    report.failed.push(key.clone());
                }
            }
        }

        self.metrics().record_invalidation(report.removed as u64);
        self.metrics()
            .record_operation_duration("invalidate", start.elapsed());
        debug!(
            requested = report.requested,
            removed = report.removed,
            failed = report.failed.len(),
            "Cache keys invalidated"
        );

        report
    }

    /// Invalida las keys que una mutación pudo dejar obsoletas.
    ///
    /// # Errors
    ///
    /// `Validation` if the mutated id cannot form a cache key.
    pub async fn invalidate_for(&self, mutation: &Mutation) -> Result<InvalidationReport> {
        let keys = mutation.invalidation_set()?;
        let report = self.invalidate(&keys).await;
        debug!(mutation = %mutation, removed = report.removed, "Mutation invalidated");
        Ok(report)
    }

    /// Elimina todas las entries de un tipo de entidad.
    ///
    /// # Errors
    ///
    /// `Upstream` if the backend cannot complete the pattern delete.
    pub async fn invalidate_kind(&self, kind: EntityKind) -> Result<usize> {
        let pattern = CacheKey::kind_pattern(kind);
        let removed = self
            .backend()
            .delete_pattern(&pattern)
            .await
            .inspect_err(|_| self.metrics().record_backend_error("delete_pattern"))?;

        self.metrics().record_invalidation(removed as u64);
        info!(pattern = %pattern, removed, "Entity cache flushed");
        Ok(removed)
    }
}
