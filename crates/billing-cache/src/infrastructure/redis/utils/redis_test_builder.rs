// crates/billing-cache/src/infrastructure/redis/utils/redis_test_builder.rs

use crate::infrastructure::redis::factories::RedisConfig;
use crate::infrastructure::redis::utils::redis_test_context::RedisTestContext;

/// Image Redis des tests d'intégration (UNLINK et SCAN disponibles)
pub(crate) const REDIS_TEST_IMAGE_TAG: &str = "7.2-alpine";

#[derive(Default)]
pub struct RedisTestContextBuilder {
    pub(crate) config: Option<RedisConfig>,
}

impl RedisTestContextBuilder {
    /// Réglages du pool ; l'url est toujours celle du container
    pub fn with_config(mut self, config: RedisConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub async fn build(self) -> RedisTestContext {
        RedisTestContext::restore(self).await
    }
}
