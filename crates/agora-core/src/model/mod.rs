//! Marketplace documents held by the primary store.

mod chat;
mod post;
mod product;
mod user;

pub use chat::{Chat, Message};
pub use post::Post;
pub use product::Product;
pub use user::{Comment, User};

use crate::normalize::Normalize;
use crate::types::{DocumentId, EntityKind};

/// A record stored in one of the primary store collections.
///
/// Every document knows which collection it belongs to and exposes the
/// identity used for `<entityType>:<id>` cache keys.
pub trait Document: Normalize + Clone + Send + Sync + 'static {
    /// Collection the document belongs to.
    const KIND: EntityKind;

    /// Returns the unique identifier of the document.
    fn id(&self) -> &DocumentId;
}
