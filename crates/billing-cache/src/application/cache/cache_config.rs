// crates/billing-cache/src/application/cache/cache_config.rs

use crate::errors::{CacheError, CacheResult};
use std::time::Duration;

/// Politique appliquée quand l'écriture du résultat calculé échoue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteBackPolicy {
    /// Le rapport dont l'écriture en cache a échoué est un rapport en échec
    #[default]
    Strict,
    /// On log et on rend quand même le résultat calculé
    BestEffort,
}

impl WriteBackPolicy {
    pub fn parse(raw: &str) -> CacheResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(CacheError::InvalidConfig {
                field: "write_back_policy",
                reason: format!("unknown policy '{other}', expected 'strict' or 'best_effort'"),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Nombre de versions conservées, les plus récentes d'abord
    pub retention_limit: usize,
    /// Taille de page du SCAN lors de la purge d'une version
    pub scan_page_size: u32,
    /// Deadline appliquée à chaque aller-retour vers le store
    pub operation_timeout: Duration,
    pub write_back_policy: WriteBackPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            retention_limit: 2,
            scan_page_size: 100,
            operation_timeout: Duration::from_secs(5),
            write_back_policy: WriteBackPolicy::Strict,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> CacheResult<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("CACHE_RETENTION_LIMIT") {
            config.retention_limit = raw.parse().map_err(|_| CacheError::InvalidConfig {
                field: "retention_limit",
                reason: format!("invalid CACHE_RETENTION_LIMIT '{raw}'"),
            })?;
        }

        if let Ok(raw) = std::env::var("CACHE_SCAN_PAGE_SIZE") {
            config.scan_page_size = raw.parse().map_err(|_| CacheError::InvalidConfig {
                field: "scan_page_size",
                reason: format!("invalid CACHE_SCAN_PAGE_SIZE '{raw}'"),
            })?;
        }

        if let Ok(raw) = std::env::var("CACHE_OPERATION_TIMEOUT_MS") {
            let millis: u64 = raw.parse().map_err(|_| CacheError::InvalidConfig {
                field: "operation_timeout",
                reason: format!("invalid CACHE_OPERATION_TIMEOUT_MS '{raw}'"),
            })?;
            config.operation_timeout = Duration::from_millis(millis);
        }

        if let Ok(raw) = std::env::var("CACHE_WRITE_BACK_POLICY") {
            config.write_back_policy = WriteBackPolicy::parse(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_retention_limit(mut self, limit: usize) -> Self {
        self.retention_limit = limit;
        self
    }

    pub fn with_scan_page_size(mut self, size: u32) -> Self {
        self.scan_page_size = size;
        self
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn with_write_back_policy(mut self, policy: WriteBackPolicy) -> Self {
        self.write_back_policy = policy;
        self
    }

    pub fn validate(&self) -> CacheResult<()> {
        if self.retention_limit == 0 {
            return Err(CacheError::InvalidConfig {
                field: "retention_limit",
                reason: "must keep at least the active version".into(),
            });
        }
        if self.scan_page_size == 0 {
            return Err(CacheError::InvalidConfig {
                field: "scan_page_size",
                reason: "must be greater than zero".into(),
            });
        }
        if self.operation_timeout.is_zero() {
            return Err(CacheError::InvalidConfig {
                field: "operation_timeout",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
