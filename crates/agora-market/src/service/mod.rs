//! Marketplace queries and mutations over the cached primary store.
//!
//! Reads by id and full-collection reads go through the cache; every other
//! query hits the primary store. Mutations validate their input, write to
//! the primary store, then invalidate before returning.

mod chats;
mod posts;
mod products;
mod users;

use std::sync::Arc;

use agora_cache::{CacheAsideStore, CacheKey, Mutation};
use agora_core::{AgoraError, Document, DocumentId, Normalize, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::store::{Collection, Filter, PrimaryStore};

/// The marketplace back end.
#[derive(Debug, Clone)]
pub struct Marketplace {
    store: PrimaryStore,
    cache: CacheAsideStore,
}

impl Marketplace {
    pub fn new(store: PrimaryStore, cache: CacheAsideStore) -> Self {
        Self { store, cache }
    }

    /// Marketplace over empty in-memory collections and an in-process cache.
    pub fn in_memory() -> Self {
        Self::new(PrimaryStore::in_memory(), CacheAsideStore::in_memory())
    }

    pub fn store(&self) -> &PrimaryStore {
        &self.store
    }

    pub fn cache(&self) -> &CacheAsideStore {
        &self.cache
    }

    /// Cached `<entity>:<id>` read. Missing documents are `NotFound`.
    async fn cached_by_id<D>(&self, collection: &Arc<dyn Collection<D>>, id: &DocumentId) -> Result<D>
    where
        D: Document + Serialize + DeserializeOwned,
    {
        let key = CacheKey::for_document(D::KIND, id)?;
        self.cache
            .read_default(&key, || collection.find_by_id(id))
            .await?
            .ok_or_else(|| AgoraError::not_found(D::KIND.as_str(), id.as_str()))
    }

    /// Cached `<entity>:all` read.
    async fn cached_all<D>(&self, collection: &Arc<dyn Collection<D>>) -> Result<Vec<D>>
    where
        D: Document + Serialize + DeserializeOwned,
    {
        let key = CacheKey::all(D::KIND);
        let docs = self
            .cache
            .read_default(&key, || async { collection.find_all().await.map(Some) })
            .await?;
        Ok(docs.unwrap_or_default())
    }

    /// Uncached filtered query, normalized like a cached one.
    async fn filtered<D: Document>(
        &self,
        collection: &Arc<dyn Collection<D>>,
        filter: Filter<'_, D>,
    ) -> Result<Vec<D>> {
        let mut docs = collection.find_by_filter(filter).await?;
        docs.normalize();
        Ok(docs)
    }

    /// Invalidates after a create and caches the new document under its own key.
    async fn created<D>(&self, doc: &D) -> Result<()>
    where
        D: Document + Serialize,
    {
        let mutation = Mutation::create(D::KIND, doc.id().clone());
        self.cache.invalidate_for(&mutation).await?;
        self.cache
            .populate(&mutation.entity_key()?, doc, self.cache.default_ttl())
            .await?;
        debug!(mutation = %mutation, "Document created");
        Ok(())
    }

    /// Invalidates after an update or a delete.
    async fn changed(&self, mutation: Mutation) -> Result<()> {
        self.cache.invalidate_for(&mutation).await?;
        debug!(mutation = %mutation, "Document changed");
        Ok(())
    }
}

fn normalized<D: Normalize>(mut doc: D) -> D {
    doc.normalize();
    doc
}
