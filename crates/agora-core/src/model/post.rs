use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Document;
use crate::normalize::{Normalize, listing_day, serde_html_date};
use crate::types::{DocumentId, EntityKind, ListingStatus};

/// A want-ad: a buyer describing an item they are looking for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub buyer_id: String,
    #[serde(default)]
    pub seller_id: Option<String>,
    pub item: String,
    pub category: String,
    pub price: f64,
    pub condition: String,
    #[serde(with = "serde_html_date")]
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub status: ListingStatus,
}

impl Post {
    /// Returns true if the given user created the post.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.buyer_id == user_id
    }
}

impl Normalize for Post {
    fn normalize(&mut self) {
        self.date = listing_day(self.date);
    }
}

impl Document for Post {
    const KIND: EntityKind = EntityKind::Post;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
