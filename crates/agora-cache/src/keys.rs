//! Cache key derivation.
//!
//! | Query | Key |
//! |---|---|
//! | single entity by id | `<entityType>:<id>` |
//! | all entities of a type | `<entityType>:all` |
//!
//! Filtered queries (by seller, by name, ...) are never cached and have no
//! key. [`CacheKey`] has private fields, so its constructors are the only
//! way to obtain a key.

use std::fmt;

use agora_core::{AgoraError, DocumentId, EntityKind, Result};

/// Discriminator reservado para la lista completa de un tipo.
pub const ALL_SCOPE: &str = "all";

/// Alcance de una key: una entidad concreta o la coleccion completa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyScope {
    All,
    Id(String),
}

/// Key unica para un resultado cacheado.
/// Queries logicas identicas producen la misma key; queries distintas nunca colisionan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    entity: EntityKind,
    scope: KeyScope,
    rendered: String,
}

impl CacheKey {
    /// Key for a single entity looked up by id.
    ///
    /// Fails when the id is empty, contains `:` or whitespace, or is the
    /// reserved word `all`, since any of those could collide with another key.
    ///
    /// # Examples
    ///
    /// ```
    /// use agora_cache::CacheKey;
    /// use agora_core::EntityKind;
    ///
    /// let key = CacheKey::entity(EntityKind::Product, "abc").unwrap();
    /// assert_eq!(key.as_str(), "product:abc");
    ///
    /// assert!(CacheKey::entity(EntityKind::Product, "all").is_err());
    /// assert!(CacheKey::entity(EntityKind::Product, "a:b").is_err());
    /// ```
    pub fn entity(entity: EntityKind, id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(AgoraError::validation("_id", "cache key id cannot be empty"));
        }
        if id.contains(':') || id.contains(char::is_whitespace) {
            return Err(AgoraError::validation(
                "_id",
                format!("'{id}' cannot be used in a cache key"),
            ));
        }
        if id == ALL_SCOPE {
            return Err(AgoraError::validation(
                "_id",
                format!("'{ALL_SCOPE}' is reserved for collection keys"),
            ));
        }
        Ok(Self {
            entity,
            scope: KeyScope::Id(id.to_string()),
            rendered: format!("{}:{}", entity.as_str(), id),
        })
    }

    /// Key for a document id; see [`CacheKey::entity`].
    pub fn for_document(entity: EntityKind, id: &DocumentId) -> Result<Self> {
        Self::entity(entity, id.as_str())
    }

    /// Key for the full collection of an entity type.
    ///
    /// # Examples
    ///
    /// ```
    /// use agora_cache::CacheKey;
    /// use agora_core::EntityKind;
    ///
    /// assert_eq!(CacheKey::all(EntityKind::Post).as_str(), "post:all");
    /// ```
    pub fn all(entity: EntityKind) -> Self {
        Self {
            entity,
            scope: KeyScope::All,
            rendered: format!("{}:{}", entity.as_str(), ALL_SCOPE),
        }
    }

    /// Glob pattern matching every key of an entity type.
    pub fn kind_pattern(entity: EntityKind) -> String {
        format!("{}:*", entity.as_str())
    }

    /// Retorna el tipo de entidad.
    pub fn entity_kind(&self) -> EntityKind {
        self.entity
    }

    /// Retorna el alcance de la key.
    pub fn scope(&self) -> &KeyScope {
        &self.scope
    }

    /// Returns the rendered key.
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
