//! Invalidation policy per mutation kind.
//!
//! | Mutation | Keys invalidated |
//! |---|---|
//! | create | `<entityType>:all` |
//! | update | `<entityType>:<id>`, `<entityType>:all` |
//! | delete | `<entityType>:<id>`, `<entityType>:all` |
//!
//! On create the new entity's own key may be populated with the value just
//! written, since nothing stale can exist under it.

use std::collections::BTreeSet;
use std::fmt;

use agora_core::{DocumentId, EntityKind, Result};

use crate::keys::CacheKey;

/// Kind of write applied to the primary store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// A committed write on one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    kind: MutationKind,
    entity: EntityKind,
    id: DocumentId,
}

impl Mutation {
    pub fn create(entity: EntityKind, id: DocumentId) -> Self {
        Self {
            kind: MutationKind::Create,
            entity,
            id,
        }
    }

    pub fn update(entity: EntityKind, id: DocumentId) -> Self {
        Self {
            kind: MutationKind::Update,
            entity,
            id,
        }
    }

    pub fn delete(entity: EntityKind, id: DocumentId) -> Self {
        Self {
            kind: MutationKind::Delete,
            entity,
            id,
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Key of the mutated document itself.
    pub fn entity_key(&self) -> Result<CacheKey> {
        CacheKey::for_document(self.entity, &self.id)
    }

    /// Keys whose cached results this mutation may have made stale.
    pub fn invalidation_set(&self) -> Result<InvalidationSet> {
        InvalidationSet::for_mutation(self)
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.kind.as_str(), self.entity, self.id)
    }
}

/// The set of cache keys purged as a side effect of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationSet {
    keys: BTreeSet<CacheKey>,
}

impl InvalidationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the set for a mutation from the policy table.
    ///
    /// # Examples
    ///
    /// ```
    /// use agora_cache::{Mutation, InvalidationSet};
    /// use agora_core::{DocumentId, EntityKind};
    ///
    /// let edit = Mutation::update(EntityKind::Product, DocumentId::new("abc"));
    /// let set = InvalidationSet::for_mutation(&edit).unwrap();
    /// let keys: Vec<&str> = set.iter().map(|k| k.as_str()).collect();
    /// assert_eq!(keys, vec!["product:all", "product:abc"]);
    /// ```
    pub fn for_mutation(mutation: &Mutation) -> Result<Self> {
        let mut set = Self::new();
        set.insert(CacheKey::all(mutation.entity));
        match mutation.kind {
            MutationKind::Create => {}
            MutationKind::Update | MutationKind::Delete => {
                set.insert(mutation.entity_key()?);
            }
        }
        Ok(set)
    }

    pub fn insert(&mut self, key: CacheKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CacheKey> {
        self.keys.iter()
    }
}

impl FromIterator<CacheKey> for InvalidationSet {
    fn from_iter<I: IntoIterator<Item = CacheKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl Extend<CacheKey> for InvalidationSet {
    fn extend<I: IntoIterator<Item = CacheKey>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

impl<'a> IntoIterator for &'a InvalidationSet {
    type Item = &'a CacheKey;
    type IntoIter = std::collections::btree_set::Iter<'a, CacheKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
