// crates/billing-cache/src/domain/value_objects/cache_version.rs

use crate::errors::{CacheError, CacheResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label immuable d'une génération de déploiement (typiquement un identifiant de build).
///
/// Le label sert de namespace à toutes les clés (`cache:<version>:<key>`) et le sweep de
/// rétention scanne `cache:<version>:*`. On refuse donc `:` et les métacaractères glob,
/// sinon le pattern d'une version pourrait matcher les clés d'une autre.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheVersion(String);

impl CacheVersion {
    pub const MAX_LEN: usize = 128;
    const FORBIDDEN: [char; 6] = [':', '*', '?', '[', ']', '\\'];

    pub fn try_new(value: impl Into<String>) -> CacheResult<Self> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(CacheError::InvalidKey {
                reason: "cache version cannot be empty".into(),
            });
        }

        if trimmed.len() > Self::MAX_LEN {
            return Err(CacheError::InvalidKey {
                reason: format!("cache version exceeds {} bytes", Self::MAX_LEN),
            });
        }

        if let Some(c) = trimmed.chars().find(|c| Self::FORBIDDEN.contains(c) || c.is_whitespace()) {
            return Err(CacheError::InvalidKey {
                reason: format!("cache version '{trimmed}' contains forbidden character {c:?}"),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
