//! In-memory collection.

use std::collections::BTreeMap;

use agora_core::{AgoraError, Document, DocumentId, Result};
use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Change, Collection, Filter};

/// Collection held in an ordered map keyed by id.
///
/// Documents are returned in id order, which for generated ids is creation
/// order.
#[derive(Debug)]
pub struct InMemoryCollection<D> {
    docs: RwLock<BTreeMap<DocumentId, D>>,
}

impl<D: Document> InMemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Creates a collection pre-loaded with `docs`.
    pub fn with_documents(docs: impl IntoIterator<Item = D>) -> Self {
        let docs = docs
            .into_iter()
            .map(|doc| (doc.id().clone(), doc))
            .collect();
        Self {
            docs: RwLock::new(docs),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl<D: Document> Default for InMemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> Collection<D> for InMemoryCollection<D> {
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<D>> {
        Ok(self.docs.read().get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<D>> {
        Ok(self.docs.read().values().cloned().collect())
    }

    async fn find_by_filter(&self, filter: Filter<'_, D>) -> Result<Vec<D>> {
        Ok(self
            .docs
            .read()
            .values()
            .filter(|doc| filter(doc))
            .cloned()
            .collect())
    }

    async fn insert(&self, doc: D) -> Result<D> {
        let mut docs = self.docs.write();
        if docs.contains_key(doc.id()) {
            return Err(AgoraError::conflict(format!(
                "{} '{}' already exists",
                D::KIND,
                doc.id()
            )));
        }
        docs.insert(doc.id().clone(), doc.clone());
        Ok(doc)
    }

    async fn update(&self, doc: D) -> Result<Option<D>> {
        let mut docs = self.docs.write();
        match docs.get_mut(doc.id()) {
            Some(slot) => {
                *slot = doc.clone();
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    async fn modify(&self, id: &DocumentId, change: Change<'_, D>) -> Result<Option<D>> {
        let mut docs = self.docs.write();
        let Some(slot) = docs.get_mut(id) else {
            return Ok(None);
        };
        // A failed change must leave the stored document untouched
        let mut edited = slot.clone();
        change(&mut edited)?;
        *slot = edited.clone();
        Ok(Some(edited))
    }

    async fn delete(&self, id: &DocumentId) -> Result<Option<D>> {
        Ok(self.docs.write().remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::model::Chat;

    fn chat(id: &str, participants: &[&str]) -> Chat {
        Chat {
            id: DocumentId::new(id),
            participants: participants.iter().map(|p| p.to_string()).collect(),
            messages: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let chats = InMemoryCollection::new();
        chats.insert(chat("c1", &["a", "b"])).await.unwrap();

        let found = chats.find_by_id(&DocumentId::new("c1")).await.unwrap();
        assert_eq!(found.unwrap().participants, vec!["a", "b"]);
        assert!(chats.find_by_id(&DocumentId::new("c2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let chats = InMemoryCollection::with_documents([chat("c1", &["a"])]);
        let err = chats.insert(chat("c1", &["b"])).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(chats.len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_absent() {
        let chats: InMemoryCollection<Chat> = InMemoryCollection::new();
        assert!(chats.update(chat("c1", &["a"])).await.unwrap().is_none());
        assert!(chats.delete(&DocumentId::new("c1")).await.unwrap().is_none());
        assert!(chats.is_empty());
    }

    #[tokio::test]
    async fn test_modify_applies_change() {
        let chats = InMemoryCollection::with_documents([chat("c1", &["a"])]);
        let modified = chats
            .modify(
                &DocumentId::new("c1"),
                Box::new(|c: &mut Chat| {
                    c.participants.push("b".to_string());
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(modified.unwrap().participants, vec!["a", "b"]);

        let missing = chats
            .modify(&DocumentId::new("c2"), Box::new(|_: &mut Chat| Ok(())))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_failed_modify_keeps_document() {
        let chats = InMemoryCollection::with_documents([chat("c1", &["a"])]);
        let err = chats
            .modify(
                &DocumentId::new("c1"),
                Box::new(|c: &mut Chat| {
                    c.participants.clear();
                    Err(AgoraError::conflict("rejected"))
                }),
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let stored = chats.find_by_id(&DocumentId::new("c1")).await.unwrap();
        assert_eq!(stored.unwrap().participants, vec!["a"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_modify_loses_nothing() {
        let chats = std::sync::Arc::new(InMemoryCollection::with_documents([chat("c1", &[])]));

        let tasks: Vec<_> = (0..200)
            .map(|i| {
                let chats = chats.clone();
                tokio::spawn(async move {
                    chats
                        .modify(
                            &DocumentId::new("c1"),
                            Box::new(move |c: &mut Chat| {
                                c.participants.push(format!("u{i}"));
                                Ok(())
                            }),
                        )
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = chats.find_by_id(&DocumentId::new("c1")).await.unwrap();
        assert_eq!(stored.unwrap().participants.len(), 200);
    }

    #[tokio::test]
    async fn test_find_by_filter_in_id_order() {
        let chats = InMemoryCollection::with_documents([
            chat("c2", &["a", "b"]),
            chat("c1", &["a"]),
            chat("c3", &["b"]),
        ]);
        let with_a = chats
            .find_by_filter(&|c: &Chat| c.participants.contains(&"a".to_string()))
            .await
            .unwrap();
        let ids: Vec<&str> = with_a.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }
}
