// crates/billing-cache/tests/common/setup_redis_test_cache.rs

use billing_cache::application::cache::{CacheConfig, VersionedCache};
use billing_cache::clock::FixedClock;
use billing_cache::domain::repositories::CacheStore;
use billing_cache::domain::value_objects::CacheVersion;
use billing_cache::infrastructure::redis::factories::RedisConfig;
use billing_cache::infrastructure::redis::utils::RedisTestContext;
use std::sync::Arc;

pub async fn setup_redis_test_cache() -> RedisTestContext {
    // Deux connexions suffisent pour les tests
    RedisTestContext::builder()
        .with_config(RedisConfig {
            max_clients: 2,
            ..RedisConfig::default()
        })
        .build()
        .await
}

pub async fn build_cache(
    ctx: &RedisTestContext,
    version: &str,
    registered_at: i64,
    config: CacheConfig,
) -> VersionedCache {
    let store: Arc<dyn CacheStore> = ctx.store();

    VersionedCache::builder(store, CacheVersion::try_new(version).unwrap())
        .with_config(config)
        .with_clock(Arc::new(FixedClock::at_nanos(registered_at)))
        .build()
        .await
        .expect("Failed to build VersionedCache on the Redis IT container")
}
