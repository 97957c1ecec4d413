use serde::{Deserialize, Serialize};

use super::Document;
use crate::normalize::Normalize;
use crate::types::{DocumentId, EntityKind};

/// A rating left on a user's profile by another user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    /// Id of the user who wrote the comment.
    pub comment_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// A marketplace member. The id comes from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    /// Favorited product ids, in the order they were added.
    #[serde(default)]
    pub favorite: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl User {
    /// Returns the comment written by `commenter`, if any.
    pub fn comment_from(&self, commenter: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.comment_id == commenter)
    }

    /// Mean rating rounded to two decimals, or `None` without comments.
    ///
    /// # Example
    ///
    /// ```
    /// use agora_core::model::{Comment, User};
    /// use agora_core::DocumentId;
    ///
    /// let mut user = User {
    ///     id: DocumentId::new("u1"),
    ///     email: "u1@campus.edu".into(),
    ///     firstname: "Ana".into(),
    ///     lastname: "Lopez".into(),
    ///     favorite: vec![],
    ///     comments: vec![],
    /// };
    /// assert_eq!(user.rating(), None);
    ///
    /// for (who, rating) in [("u2", 5), ("u3", 4), ("u4", 4)] {
    ///     user.comments.push(Comment {
    ///         id: DocumentId::generate(),
    ///         comment_id: who.into(),
    ///         rating,
    ///         comment: String::new(),
    ///     });
    /// }
    /// assert_eq!(user.rating(), Some(4.33));
    /// ```
    pub fn rating(&self) -> Option<f64> {
        if self.comments.is_empty() {
            return None;
        }
        let total: u32 = self.comments.iter().map(|c| u32::from(c.rating)).sum();
        let mean = f64::from(total) / self.comments.len() as f64;
        Some((mean * 100.0).round() / 100.0)
    }
}

impl Normalize for User {
    fn normalize(&mut self) {}
}

impl Document for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
