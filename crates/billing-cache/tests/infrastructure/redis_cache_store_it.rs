// crates/billing-cache/tests/infrastructure/redis_cache_store_it.rs

use billing_cache::domain::repositories::{CacheStore, SCAN_START_CURSOR};
use std::collections::HashSet;
use std::time::Duration;
use crate::common::setup_redis_test_cache;

#[tokio::test]
async fn test_write_read_delete_bytes() {
    let ctx = setup_redis_test_cache().await;
    let store = ctx.store();

    store.write("cache:v1:k", b"{\"a\":1}", None).await.unwrap();
    assert_eq!(store.read("cache:v1:k").await.unwrap(), Some(b"{\"a\":1}".to_vec()));

    store.delete_key("cache:v1:k").await.unwrap();
    store.delete_key("cache:v1:k").await.unwrap();
    assert_eq!(store.read("cache:v1:k").await.unwrap(), None);
}

#[tokio::test]
async fn test_sub_second_ttl_expires() {
    let ctx = setup_redis_test_cache().await;
    let store = ctx.store();

    store
        .write("cache:v1:short", b"1", Some(Duration::from_millis(200)))
        .await
        .unwrap();
    assert!(store.read("cache:v1:short").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(store.read("cache:v1:short").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sorted_index_orders_by_score_desc() {
    let ctx = setup_redis_test_cache().await;
    let store = ctx.store();

    store.register_index_entry("cache:versions", "v2", 200.0).await.unwrap();
    store.register_index_entry("cache:versions", "v1", 100.0).await.unwrap();
    store.register_index_entry("cache:versions", "v3", 300.0).await.unwrap();
    // add-or-update-score : pas de doublon
    store.register_index_entry("cache:versions", "v1", 400.0).await.unwrap();

    assert_eq!(
        store.list_index_descending("cache:versions").await.unwrap(),
        vec!["v1", "v3", "v2"]
    );

    store.remove_index_entry("cache:versions", "v3").await.unwrap();
    assert_eq!(
        store.list_index_descending("cache:versions").await.unwrap(),
        vec!["v1", "v2"]
    );
}

#[tokio::test]
async fn test_scan_pages_cover_all_prefixed_keys() {
    let ctx = setup_redis_test_cache().await;
    let store = ctx.store();

    for i in 0..250 {
        store.write(&format!("cache:old:{i}"), b"x", None).await.unwrap();
    }
    store.write("cache:new:0", b"x", None).await.unwrap();

    let mut seen = HashSet::new();
    let mut cursor = SCAN_START_CURSOR.to_string();
    loop {
        let page = store.scan_keys_by_prefix("cache:old:", &cursor, 50).await.unwrap();
        seen.extend(page.keys.iter().cloned());
        if page.is_last() {
            break;
        }
        cursor = page.next_cursor;
    }

    assert_eq!(seen.len(), 250);
    assert!(seen.iter().all(|k| k.starts_with("cache:old:")));
}

#[tokio::test]
async fn test_bulk_delete_and_flush() {
    let ctx = setup_redis_test_cache().await;
    let store = ctx.store();

    let keys: Vec<String> = (0..10).map(|i| format!("cache:v1:{i}")).collect();
    for key in &keys {
        store.write(key, b"x", None).await.unwrap();
    }
    store.write("cache:v2:keep", b"x", None).await.unwrap();

    store.bulk_delete_non_blocking(&keys).await.unwrap();
    for key in &keys {
        assert!(store.read(key).await.unwrap().is_none());
    }
    assert!(store.read("cache:v2:keep").await.unwrap().is_some());

    store.delete_all().await.unwrap();
    assert!(store.read("cache:v2:keep").await.unwrap().is_none());
}
