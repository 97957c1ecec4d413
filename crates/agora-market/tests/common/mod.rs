#![allow(dead_code)]
use agora_market::{Marketplace, NewUser, PostInput, ProductInput};

pub const SELLER: &str = "uidseller";
pub const BUYER: &str = "uidbuyer";

pub fn new_user(id: &str, first: &str) -> NewUser {
    NewUser {
        id: id.to_string(),
        email: format!("{id}@campus.edu"),
        firstname: first.to_string(),
        lastname: "Tester".to_string(),
        favorite: None,
    }
}

pub fn lamp_input() -> ProductInput {
    ProductInput {
        name: "Desk lamp".to_string(),
        price: 15.5,
        description: "Warm light, barely used".to_string(),
        condition: "Like New".to_string(),
        seller_id: SELLER.to_string(),
        image: Some("https://bucket.s3.amazonaws.com/lamp.png".to_string()),
        category: "Furniture".to_string(),
    }
}

pub fn textbook_input() -> ProductInput {
    ProductInput {
        name: "Calculus textbook".to_string(),
        price: 40.0,
        description: "8th edition".to_string(),
        condition: "good".to_string(),
        seller_id: SELLER.to_string(),
        image: None,
        category: "books".to_string(),
    }
}

pub fn calculator_post() -> PostInput {
    PostInput {
        buyer_id: BUYER.to_string(),
        item: "Graphing calculator".to_string(),
        category: "electronics".to_string(),
        price: 35.0,
        condition: "fair".to_string(),
        description: "TI-84 or similar".to_string(),
    }
}

/// Marketplace with a registered seller and buyer.
pub async fn market_with_users() -> Marketplace {
    let market = Marketplace::in_memory();
    market.add_user(new_user(SELLER, "Sam")).await.unwrap();
    market.add_user(new_user(BUYER, "Bea")).await.unwrap();
    market
}

/// Whether `key` currently holds a cache entry.
pub async fn is_cached(market: &Marketplace, key: &str) -> bool {
    market.cache().backend().get(key).await.unwrap().is_some()
}
