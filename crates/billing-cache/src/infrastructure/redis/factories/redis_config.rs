// crates/billing-cache/src/infrastructure/redis/factories/redis_config.rs

use crate::errors::{AppError, AppResult, ErrorCode};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_clients: usize,
    pub connection_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_clients: 16,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> AppResult<Self> {
        let timeout_ms: u64 = std::env::var("REDIS_CONNECTION_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|_| AppError::new(ErrorCode::ValidationFailed, "Invalid REDIS_CONNECTION_TIMEOUT_MS"))?;

        Ok(Self {
            url: std::env::var("REDIS_URL")
                .map_err(|_| AppError::new(ErrorCode::ValidationFailed, "REDIS_URL must be set"))?,
            max_clients: std::env::var("REDIS_MAX_CLIENTS")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .map_err(|_| AppError::new(ErrorCode::ValidationFailed, "Invalid REDIS_MAX_CLIENTS"))?,
            connection_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
