// crates/billing-cache/tests/infrastructure/versioned_cache_it.rs

use billing_cache::application::cache::{CacheConfig, VersionedCache};
use billing_cache::clock::FixedClock;
use billing_cache::domain::repositories::{CacheStore, SCAN_START_CURSOR};
use billing_cache::domain::value_objects::{CacheVersion, VERSION_INDEX_KEY};
use billing_cache::infrastructure::redis::factories::RedisContext;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use crate::common::{build_cache, setup_redis_test_cache};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MerchantBalance {
    merchant_id: String,
    debit: i64,
    credit: i64,
    currencies: Vec<String>,
}

#[tokio::test]
async fn test_round_trip_and_namespacing_on_redis() {
    let ctx = setup_redis_test_cache().await;
    let v1 = build_cache(&ctx, "v1", 100, CacheConfig::default()).await;
    let v2 = build_cache(&ctx, "v2", 200, CacheConfig::default()).await;

    let balance = MerchantBalance {
        merchant_id: "m-1".into(),
        debit: 1_000,
        credit: 250,
        currencies: vec!["EUR".into(), "USD".into()],
    };

    v1.set("balance:m-1", &balance, Duration::from_secs(60)).await.unwrap();

    assert_eq!(v1.get::<MerchantBalance>("balance:m-1").await.unwrap(), balance);
    assert!(v2.get::<MerchantBalance>("balance:m-1").await.unwrap_err().is_cache_miss());

    let raw = ctx.store().read("cache:v1:balance:m-1").await.unwrap();
    assert!(raw.is_some());
}

#[tokio::test]
async fn test_retention_sweep_on_redis() {
    let ctx = setup_redis_test_cache().await;
    let config = CacheConfig::new().with_scan_page_size(10);

    let v1 = build_cache(&ctx, "v1", 100, config.clone()).await;
    let v2 = build_cache(&ctx, "v2", 200, config.clone()).await;
    let v3 = build_cache(&ctx, "v3", 300, config).await;

    for i in 0..120 {
        v1.set(&format!("report:{i}"), &i, Duration::ZERO).await.unwrap();
    }
    v2.set("report:0", &"v2", Duration::ZERO).await.unwrap();
    v3.set("report:0", &"v3", Duration::ZERO).await.unwrap();

    let report = v3.clean_oldest_version().await.unwrap();

    assert_eq!(report.purged_versions, vec!["v1"]);
    assert_eq!(report.deleted_keys, 120);

    let store = ctx.store();
    assert_eq!(
        store.list_index_descending(VERSION_INDEX_KEY).await.unwrap(),
        vec!["v3", "v2"]
    );
    let leftover = store
        .scan_keys_by_prefix("cache:v1:", SCAN_START_CURSOR, 1000)
        .await
        .unwrap();
    assert!(leftover.keys.is_empty());
    assert_eq!(v2.get::<String>("report:0").await.unwrap(), "v2");
    assert_eq!(v3.get::<String>("report:0").await.unwrap(), "v3");
}

#[tokio::test]
async fn test_two_processes_share_the_version_index() {
    let ctx = setup_redis_test_cache().await;

    // Second processus : sa propre connexion vers le même serveur
    let other = RedisContext::builder_raw()
        .with_url(ctx.url())
        .with_max_clients(1)
        .build()
        .await
        .unwrap();

    let old = build_cache(&ctx, "v1", 100, CacheConfig::default()).await;
    old.set("invoice:9", &"old", Duration::ZERO).await.unwrap();

    let other_store: Arc<dyn CacheStore> = other.store();
    let new = VersionedCache::builder(other_store, CacheVersion::try_new("v2").unwrap())
        .with_config(CacheConfig::new().with_retention_limit(1))
        .with_clock(Arc::new(FixedClock::at_nanos(200)))
        .build()
        .await
        .unwrap();

    let report = new.clean_oldest_version().await.unwrap();

    assert_eq!(report.purged_versions, vec!["v1"]);
    assert!(old.get::<String>("invoice:9").await.unwrap_err().is_cache_miss());
}

#[tokio::test]
async fn test_glob_index_entry_does_not_match_retained_versions() {
    let ctx = setup_redis_test_cache().await;
    let v1 = build_cache(&ctx, "v1", 300, CacheConfig::default()).await;
    let v2 = build_cache(&ctx, "v2", 200, CacheConfig::default()).await;

    ctx.store()
        .register_index_entry(VERSION_INDEX_KEY, "v*", 100.0)
        .await
        .unwrap();
    v1.set("invoice:1", &"kept", Duration::ZERO).await.unwrap();
    v2.set("invoice:1", &"kept", Duration::ZERO).await.unwrap();

    let report = v1.clean_oldest_version().await.unwrap();

    assert_eq!(report.dropped_entries, vec!["v*"]);
    assert_eq!(report.deleted_keys, 0);
    assert_eq!(v1.get::<String>("invoice:1").await.unwrap(), "kept");
    assert_eq!(v2.get::<String>("invoice:1").await.unwrap(), "kept");
}
