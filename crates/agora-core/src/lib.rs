//! Agora Core - Domain types, errors and validators
//!
//! This crate provides the vocabulary shared by the cache layer and the
//! marketplace service: entity kinds, document ids, the error taxonomy,
//! input validators, date normalization and the marketplace documents.

pub mod error;
pub mod model;
pub mod normalize;
pub mod types;
pub mod validation;

pub use error::{AgoraError, ErrorCode, Result};
pub use model::Document;
pub use normalize::Normalize;
pub use types::{DocumentId, EntityKind, ListingStatus};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
