// crates/billing-cache/src/domain/value_objects/cache_key.rs

use crate::domain::value_objects::CacheVersion;
use crate::errors::{CacheError, CacheResult};
use std::fmt;

pub const CACHE_KEY_PREFIX: &str = "cache";

/// Sorted set des versions connues (member = version, score = enregistrement en ns).
/// Hors de tout namespace de version.
pub const VERSION_INDEX_KEY: &str = "cache:versions";

/// Clé logique telle que fournie par l'appelant (ex: `report:revenue:2024-11`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn try_new(value: impl Into<String>) -> CacheResult<Self> {
        let inner = value.into();
        if inner.is_empty() {
            return Err(CacheError::InvalidKey {
                reason: "logical key cannot be empty".into(),
            });
        }
        Ok(Self(inner))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespaced(&self, version: &CacheVersion) -> String {
        namespaced_key(version.as_str(), &self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `cache:<version>:<key>`
pub fn namespaced_key(version: &str, key: &str) -> String {
    format!("{CACHE_KEY_PREFIX}:{version}:{key}")
}

/// `cache:<version>:` : préfixe commun à toutes les clés d'une version
pub fn version_prefix(version: &str) -> String {
    format!("{CACHE_KEY_PREFIX}:{version}:")
}
