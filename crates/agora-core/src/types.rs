//! Common type definitions and newtypes for the Agora marketplace.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The entity collections held by the primary store.
///
/// The string form is the prefix of every cache key for the type.
///
/// # Example
///
/// ```
/// use agora_core::EntityKind;
///
/// assert_eq!(EntityKind::Product.as_str(), "product");
/// assert_eq!(EntityKind::ALL.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Post,
    User,
    Chat,
}

impl EntityKind {
    /// Every entity kind, in declaration order.
    pub const ALL: [EntityKind; 4] = [Self::Product, Self::Post, Self::User, Self::Chat];

    /// Returns the canonical lowercase name of the entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Post => "post",
            Self::User => "user",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a document in the primary store.
///
/// Generated ids are time-ordered 32-char lowercase hex strings. User ids
/// come from the identity provider and are kept verbatim.
///
/// # Example
///
/// ```
/// use agora_core::DocumentId;
///
/// let id = DocumentId::generate();
/// assert_eq!(id.as_str().len(), 32);
/// assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lifecycle state shared by products and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
