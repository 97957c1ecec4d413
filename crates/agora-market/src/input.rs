//! Inputs accepted by marketplace mutations.
//!
//! Fields arrive unvalidated; each service method runs the validators from
//! `agora_core::validation` before touching the store or the cache.

use serde::Deserialize;

/// Fields of a product listing, for `add_product` and `edit_product`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub condition: String,
    pub seller_id: String,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
}

/// Fields of a want-ad, for `add_post` and `edit_post`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostInput {
    pub buyer_id: String,
    pub item: String,
    pub category: String,
    pub price: f64,
    pub condition: String,
    pub description: String,
}

/// A new member, registered under the identity-provider uid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    /// Optional first favorite product.
    #[serde(default)]
    pub favorite: Option<String>,
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEdit {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
}

/// A rating left by `comment_id` on the profile of `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentInput {
    pub user_id: String,
    pub comment_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}
