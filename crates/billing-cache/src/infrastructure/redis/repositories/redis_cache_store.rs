// crates/billing-cache/src/infrastructure/redis/repositories/redis_cache_store.rs

use async_trait::async_trait;
use bytes::Bytes;
use fred::clients::Pool;
use fred::error::{Error as RedisError, ErrorKind};
use fred::prelude::*;
use fred::types::scan::ScanType;
use fred::types::{Builder, Expiration, Value};
use std::time::Duration;

use crate::domain::repositories::{CacheStore, ScanPage};
use crate::errors::{CacheError, CacheResult};
use crate::infrastructure::redis::factories::RedisConfig;

pub struct RedisCacheStore {
    pool: Pool,
}

impl RedisCacheStore {
    pub async fn new(config: &RedisConfig) -> CacheResult<Self> {
        let redis_config = Config::from_url(&config.url)
            .map_err(|e| CacheError::StoreUnavailable(format!("invalid redis url: {e}")))?;

        let connection_timeout = config.connection_timeout;
        let pool = Builder::from_config(redis_config)
            .with_connection_config(|cfg| {
                cfg.connection_timeout = connection_timeout;
                cfg.internal_command_timeout = connection_timeout;
                cfg.max_command_attempts = 3;
            })
            .set_policy(ReconnectPolicy::new_exponential(0, 100, 1000, 2))
            .build_pool(config.max_clients)
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        pool.init()
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        // On attend que TOUS les clients du pool soient connectés
        pool.wait_for_connect()
            .await
            .map_err(|e| CacheError::StoreUnavailable(e.to_string()))?;

        Ok(Self { pool })
    }

    fn map_expiration(ttl: Option<Duration>) -> Option<Expiration> {
        // EX seulement pour des secondes entières, sinon PX arrondi à la ms supérieure
        ttl.map(|d| {
            if d.subsec_nanos() == 0 {
                Expiration::EX(d.as_secs() as i64)
            } else {
                let millis = d.as_nanos().div_ceil(1_000_000);
                Expiration::PX(millis.max(1) as i64)
            }
        })
    }

    fn is_connection_error(err: &RedisError) -> bool {
        matches!(
            err.kind(),
            ErrorKind::IO | ErrorKind::Timeout | ErrorKind::Canceled
        )
    }

    fn read_error(key: &str, err: RedisError) -> CacheError {
        if Self::is_connection_error(&err) {
            return CacheError::StoreUnavailable(err.to_string());
        }
        CacheError::StoreReadFailed {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    fn write_error(key: &str, err: RedisError) -> CacheError {
        if Self::is_connection_error(&err) {
            return CacheError::StoreUnavailable(err.to_string());
        }
        CacheError::StoreWriteFailed {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }

    fn is_unknown_command(err: &RedisError) -> bool {
        *err.kind() == ErrorKind::InvalidCommand
            || err.details().to_ascii_lowercase().contains("unknown command")
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn write(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.pool
            .set::<(), _, _>(
                key,
                Value::Bytes(Bytes::copy_from_slice(value)),
                Self::map_expiration(ttl),
                None,
                false,
            )
            .await
            .map_err(|e| Self::write_error(key, e))
    }

    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let value: Value = self
            .pool
            .get(key)
            .await
            .map_err(|e| Self::read_error(key, e))?;

        if value.is_null() {
            return Ok(None);
        }

        value
            .as_bytes()
            .map(|b| Some(b.to_vec()))
            .ok_or_else(|| CacheError::StoreReadFailed {
                key: key.to_string(),
                reason: format!("unexpected value type {:?}", value.kind()),
            })
    }

    async fn delete_key(&self, key: &str) -> CacheResult<()> {
        self.pool
            .del::<i64, _>(key)
            .await
            .map_err(|e| Self::write_error(key, e))?;
        Ok(())
    }

    async fn delete_all(&self) -> CacheResult<()> {
        self.pool
            .next()
            .flushall::<()>(false)
            .await
            .map_err(|e| Self::write_error("*", e))
    }

    async fn register_index_entry(&self, index_key: &str, member: &str, score: f64) -> CacheResult<()> {
        self.pool
            .zadd::<i64, _, _>(index_key, None, None, false, false, (score, member))
            .await
            .map_err(|e| Self::write_error(index_key, e))?;
        Ok(())
    }

    async fn list_index_descending(&self, index_key: &str) -> CacheResult<Vec<String>> {
        self.pool
            .zrevrange::<Vec<String>, _>(index_key, 0, -1, false)
            .await
            .map_err(|e| Self::read_error(index_key, e))
    }

    async fn remove_index_entry(&self, index_key: &str, member: &str) -> CacheResult<()> {
        self.pool
            .zrem::<i64, _, _>(index_key, member)
            .await
            .map_err(|e| Self::write_error(index_key, e))?;
        Ok(())
    }

    async fn scan_keys_by_prefix(
        &self,
        prefix: &str,
        cursor: &str,
        page_size: u32,
    ) -> CacheResult<ScanPage> {
        let pattern = format!("{prefix}*");

        let (next_cursor, keys): (String, Vec<String>) = self
            .pool
            .scan_page::<(String, Vec<String>), String, String>(
                cursor.to_string(),
                pattern.clone(),
                Some(page_size),
                None::<ScanType>,
            )
            .await
            .map_err(|e| Self::read_error(&pattern, e))?;

        Ok(ScanPage { keys, next_cursor })
    }

    async fn bulk_delete_non_blocking(&self, keys: &[String]) -> CacheResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        match self.pool.unlink::<i64, _>(keys.to_vec()).await {
            Ok(_) => Ok(()),
            // Serveur sans UNLINK (< 4.0) : DEL synchrone, même contrat, latence différente
            Err(e) if Self::is_unknown_command(&e) => {
                tracing::warn!("UNLINK unsupported by the server, falling back to DEL");
                self.pool
                    .del::<i64, _>(keys.to_vec())
                    .await
                    .map_err(|e| Self::write_error("bulk", e))?;
                Ok(())
            }
            Err(e) => Err(Self::write_error("bulk", e)),
        }
    }
}
