mod common;

use std::time::Duration;

use agora_cache::{CacheAsideStore, CacheKey, InvalidationSet};
use agora_core::model::Product;
use agora_core::normalize::html_date;
use agora_core::{AgoraError, EntityKind, ErrorCode};
use common::{FetchCounter, TTL, flaky_store, widget};

fn product_key(id: &str) -> CacheKey {
    CacheKey::entity(EntityKind::Product, id).unwrap()
}

#[tokio::test]
async fn second_read_within_ttl_is_served_from_cache() {
    let store = CacheAsideStore::in_memory();
    let key = product_key("abc");
    let fetches = FetchCounter::new();

    let first = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap();
    let second = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap();

    assert_eq!(fetches.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(store.metrics().hits(), 1);
    assert_eq!(store.metrics().misses(), 1);
}

#[tokio::test]
async fn returned_value_is_normalized_on_miss_and_hit() {
    let store = CacheAsideStore::in_memory();
    let key = product_key("abc");
    let fetches = FetchCounter::new();

    let miss: Product = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap()
        .unwrap();
    let hit: Product = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(html_date(miss.date), "2024-09-01");
    assert_eq!(miss.date.to_rfc3339(), "2024-09-01T00:00:00+00:00");
    assert_eq!(hit, miss);
}

#[tokio::test]
async fn widget_scenario_hit_then_invalidate_then_refetch() {
    let store = CacheAsideStore::in_memory();
    let key = product_key("abc");
    let fetches = FetchCounter::new();

    let first = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.name, "Widget");
    assert_eq!(fetches.calls(), 1);

    let cached = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.name, "Widget");
    assert_eq!(fetches.calls(), 1);

    let keys: InvalidationSet = [key.clone()].into_iter().collect();
    store.invalidate(&keys).await;

    let mut renamed = widget();
    renamed.name = "Gadget".to_string();
    let refetched = store
        .read(&key, TTL, fetches.returning(Some(renamed)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refetched.name, "Gadget");
    assert_eq!(fetches.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn entry_expires_after_ttl() {
    let store = CacheAsideStore::in_memory();
    let key = product_key("abc");
    let fetches = FetchCounter::new();

    store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap();

    tokio::time::advance(TTL - Duration::from_secs(1)).await;
    store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap();
    assert_eq!(fetches.calls(), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap();
    assert_eq!(fetches.calls(), 2);
}

#[tokio::test]
async fn not_found_is_never_cached() {
    let store = CacheAsideStore::in_memory();
    let key = product_key("missing");
    let fetches = FetchCounter::new();

    let first = store
        .read(&key, TTL, fetches.returning::<Product>(None))
        .await
        .unwrap();
    let second = store
        .read(&key, TTL, fetches.returning::<Product>(None))
        .await
        .unwrap();

    assert!(first.is_none());
    assert!(second.is_none());
    assert_eq!(fetches.calls(), 2);
    assert_eq!(store.metrics().negative_results(), 2);
    assert!(store.backend().get("product:missing").await.unwrap().is_none());
}

#[tokio::test]
async fn fetch_error_propagates_without_caching() {
    let store = CacheAsideStore::in_memory();
    let key = product_key("abc");
    let fetches = FetchCounter::new();

    let err = store
        .read(
            &key,
            TTL,
            fetches.failing::<Product>(AgoraError::upstream("primary", "connection reset")),
        )
        .await
        .unwrap_err();

    assert!(err.is_upstream());
    assert_eq!(err.code(), ErrorCode::InternalServerError);
    assert!(err.to_string().contains("connection reset"));
    assert!(store.backend().get("product:abc").await.unwrap().is_none());

    let not_found = store
        .read(
            &key,
            TTL,
            fetches.failing::<Product>(AgoraError::not_found("product", "abc")),
        )
        .await
        .unwrap_err();
    assert!(not_found.is_not_found());
    assert_eq!(fetches.calls(), 2);
}

#[tokio::test]
async fn backend_lookup_failure_falls_back_to_fetch() {
    common::init_tracing();
    let (store, backend) = flaky_store();
    let key = product_key("abc");
    let fetches = FetchCounter::new();
    backend.fail_reads(true);

    let value = store
        .read(&key, TTL, fetches.returning(Some(widget())))
        .await
        .unwrap();

    assert_eq!(value.unwrap().name, "Widget");
    assert_eq!(fetches.calls(), 1);
    assert_eq!(store.metrics().backend_errors(), 1);
    assert_eq!(backend.writes(), 1);
}

#[tokio::test]
async fn backend_write_failure_still_returns_value() {
    common::init_tracing();
    let (store, backend) = flaky_store();
    let key = product_key("abc");
    let fetches = FetchCounter::new();
    backend.fail_writes(true);

    for _ in 0..2 {
        let value = store
            .read(&key, TTL, fetches.returning(Some(widget())))
            .await
            .unwrap();
        assert!(value.is_some());
    }

    assert_eq!(fetches.calls(), 2);
    assert_eq!(backend.writes(), 0);
    assert_eq!(store.metrics().backend_errors(), 2);
}

#[tokio::test]
async fn collection_key_caches_lists() {
    let store = CacheAsideStore::in_memory();
    let key = CacheKey::all(EntityKind::Product);
    let fetches = FetchCounter::new();

    let list = store
        .read_default(&key, fetches.returning(Some(vec![widget()])))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(list.len(), 1);

    let cached: Vec<Product> = store
        .read_default(&key, fetches.returning(Some(Vec::new())))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached, list);
    assert_eq!(fetches.calls(), 1);
}
