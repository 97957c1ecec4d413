use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Document;
use crate::normalize::{Normalize, listing_day, serde_html_date};
use crate::types::{DocumentId, EntityKind, ListingStatus};

/// An item offered for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub price: f64,
    /// Listing date; exposed as `YYYY-MM-DD`.
    #[serde(with = "serde_html_date")]
    pub date: DateTime<Utc>,
    pub description: String,
    pub condition: String,
    pub seller_id: String,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
    #[serde(default)]
    pub status: ListingStatus,
}

impl Normalize for Product {
    fn normalize(&mut self) {
        self.date = listing_day(self.date);
    }
}

impl Document for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}
