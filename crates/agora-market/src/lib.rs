//! Agora Market - the campus marketplace back end
//!
//! Products, want-ad posts, users and chats over a primary store, with
//! by-id and full-collection reads served through the cache-aside store
//! from `agora-cache`.

pub mod input;
pub mod service;
pub mod store;

pub use input::{CommentInput, NewUser, PostInput, ProductInput, UserEdit};
pub use service::Marketplace;
pub use store::{Change, Collection, InMemoryCollection, PrimaryStore};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
