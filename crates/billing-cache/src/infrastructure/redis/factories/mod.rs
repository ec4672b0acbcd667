// crates/billing-cache/src/infrastructure/redis/factories/mod.rs

mod redis_config;
mod redis_context;
mod redis_context_builder;

pub use redis_config::RedisConfig;
pub use redis_context::RedisContext;
pub use redis_context_builder::RedisContextBuilder;

use crate::application::cache::{CacheConfig, VersionedCache};
use crate::domain::repositories::CacheStore;
use crate::domain::value_objects::CacheVersion;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::infrastructure::redis::repositories::RedisCacheStore;
use std::sync::Arc;

pub async fn create_redis_store(config: &RedisConfig) -> AppResult<Arc<RedisCacheStore>> {
    let store = RedisCacheStore::new(config).await.map_err(|e| {
        AppError::new(
            ErrorCode::ServiceUnavailable,
            format!("Failed to connect to Redis: {}", e),
        )
    })?;

    Ok(Arc::new(store))
}

/// Point d'entrée des services : une instance par processus, injectée ensuite partout
pub async fn create_versioned_cache(
    redis: &RedisConfig,
    version: CacheVersion,
    config: CacheConfig,
) -> AppResult<Arc<VersionedCache>> {
    let store: Arc<dyn CacheStore> = create_redis_store(redis).await?;

    let cache = VersionedCache::builder(store, version)
        .with_config(config)
        .build()
        .await?;

    Ok(Arc::new(cache))
}
