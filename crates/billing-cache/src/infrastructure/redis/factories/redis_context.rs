// crates/billing-cache/src/infrastructure/redis/factories/redis_context.rs

use std::sync::Arc;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::infrastructure::redis::repositories::RedisCacheStore;
use crate::infrastructure::redis::factories::{RedisConfig, RedisContextBuilder};

pub struct RedisContext {
    store: Arc<RedisCacheStore>,
    config: RedisConfig,
}

impl RedisContext {
    pub fn builder_raw() -> RedisContextBuilder {
        RedisContextBuilder::default()
    }

    pub fn store(&self) -> Arc<RedisCacheStore> {
        self.store.clone()
    }

    pub fn url(&self) -> String {
        self.config.url.clone()
    }

    pub(crate) async fn restore(builder: RedisContextBuilder) -> AppResult<Self> {
        let store = RedisCacheStore::new(&builder.config).await.map_err(|e| {
            AppError::new(
                ErrorCode::ServiceUnavailable,
                format!("Failed to connect to Redis at {}: {}", builder.config.url, e),
            )
        })?;

        Ok(Self {
            store: Arc::new(store),
            config: builder.config,
        })
    }
}
