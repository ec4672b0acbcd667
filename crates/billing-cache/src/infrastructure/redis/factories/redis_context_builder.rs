// crates/billing-cache/src/infrastructure/redis/factories/redis_context_builder.rs

use crate::errors::AppResult;
use crate::infrastructure::redis::factories::{RedisConfig, RedisContext};
use std::time::Duration;

#[derive(Default)]
pub struct RedisContextBuilder {
    pub(crate) config: RedisConfig,
}

impl RedisContextBuilder {
    pub fn with_config(mut self, config: RedisConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    pub fn with_max_clients(mut self, max: usize) -> Self {
        self.config.max_clients = max;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.config.connection_timeout = timeout;
        self
    }

    pub async fn build(self) -> AppResult<RedisContext> {
        RedisContext::restore(self).await
    }
}
