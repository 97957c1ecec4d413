//! Primary store accessors.
//!
//! The primary store is authoritative; the cache only ever holds copies of
//! what a [`Collection`] returned.

mod memory;

use std::sync::Arc;

use agora_core::model::{Chat, Post, Product, User};
use agora_core::{Document, DocumentId, Result};
use async_trait::async_trait;

pub use memory::InMemoryCollection;

/// Predicate used by [`Collection::find_by_filter`].
pub type Filter<'a, D> = &'a (dyn Fn(&D) -> bool + Send + Sync);

/// In-place edit applied by [`Collection::modify`].
pub type Change<'a, D> = Box<dyn FnOnce(&mut D) -> Result<()> + Send + 'a>;

/// A collection of documents of one entity type.
///
/// # Implementors
///
/// - `InMemoryCollection` - Ordered map behind a read-write lock
#[async_trait]
pub trait Collection<D: Document>: Send + Sync {
    /// Returns the document with the given id, or `None`.
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<D>>;

    /// Returns every document.
    async fn find_all(&self) -> Result<Vec<D>>;

    /// Returns every document matching `filter`.
    async fn find_by_filter(&self, filter: Filter<'_, D>) -> Result<Vec<D>>;

    /// Inserts a new document.
    ///
    /// # Errors
    ///
    /// `Conflict` if a document with the same id already exists.
    async fn insert(&self, doc: D) -> Result<D>;

    /// Replaces an existing document, returning the stored value, or `None`
    /// if there was nothing to replace.
    async fn update(&self, doc: D) -> Result<Option<D>>;

    /// Applies `change` to the stored document as a single atomic step and
    /// returns the result, or `None` if the document does not exist.
    ///
    /// Concurrent modifications of the same document never overwrite each
    /// other. If `change` fails, the stored document is left untouched and
    /// the error is returned.
    async fn modify(&self, id: &DocumentId, change: Change<'_, D>) -> Result<Option<D>>;

    /// Deletes a document, returning it, or `None` if it did not exist.
    async fn delete(&self, id: &DocumentId) -> Result<Option<D>>;
}

/// The four marketplace collections.
#[derive(Clone)]
pub struct PrimaryStore {
    pub products: Arc<dyn Collection<Product>>,
    pub posts: Arc<dyn Collection<Post>>,
    pub users: Arc<dyn Collection<User>>,
    pub chats: Arc<dyn Collection<Chat>>,
}

impl PrimaryStore {
    /// Store with empty in-memory collections.
    pub fn in_memory() -> Self {
        Self {
            products: Arc::new(InMemoryCollection::new()),
            posts: Arc::new(InMemoryCollection::new()),
            users: Arc::new(InMemoryCollection::new()),
            chats: Arc::new(InMemoryCollection::new()),
        }
    }
}

impl std::fmt::Debug for PrimaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimaryStore").finish_non_exhaustive()
    }
}
