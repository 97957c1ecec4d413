#![allow(dead_code)]
use agora_core::model::{Post, Product};
use agora_core::{DocumentId, ListingStatus};
use chrono::{TimeZone, Utc};

/// Helper to decode a Product from a JSON string slice.
/// Panics if the JSON is invalid (intended for tests).
pub fn product_from_json(json: &str) -> Product {
    serde_json::from_str(json).expect("Failed to create test product from JSON")
}

/// Returns a product fixture listed mid-afternoon.
pub fn desk_lamp() -> Product {
    Product {
        id: DocumentId::new("0191e0a4c8e07b6a9d3f2c1b0a998877"),
        name: "Desk lamp".to_string(),
        price: 15.5,
        date: Utc.with_ymd_and_hms(2024, 2, 14, 16, 20, 0).unwrap(),
        description: "Warm light, barely used".to_string(),
        condition: "like new".to_string(),
        seller_id: "uid-seller".to_string(),
        buyer_id: None,
        image: Some("https://bucket.s3.amazonaws.com/lamp.png".to_string()),
        category: "furniture".to_string(),
        status: ListingStatus::Active,
    }
}

/// Returns a want-ad fixture.
pub fn wanted_calculator() -> Post {
    Post {
        id: DocumentId::new("0191e0a4c8e07b6a9d3f2c1b0a998878"),
        buyer_id: "uid-buyer".to_string(),
        seller_id: None,
        item: "Graphing calculator".to_string(),
        category: "electronics".to_string(),
        price: 40.0,
        condition: "good".to_string(),
        date: Utc.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap(),
        description: "TI-84 or similar".to_string(),
        status: ListingStatus::Active,
    }
}
