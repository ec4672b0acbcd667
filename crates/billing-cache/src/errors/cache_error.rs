// crates/billing-cache/src/errors/cache_error.rs

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Store injoignable (construction ou appel), toujours fatal pour l'opération en cours
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Cache read failed for '{key}': {reason}")]
    StoreReadFailed { key: String, reason: String },

    #[error("Cache write failed for '{key}': {reason}")]
    StoreWriteFailed { key: String, reason: String },

    /// Pas une panne : résultat normal d'un `get` sur une clé absente ou expirée
    #[error("Cache miss for key '{key}'")]
    CacheMiss { key: String },

    #[error("Failed to serialize value for '{key}': {reason}")]
    SerializationFailed { key: String, reason: String },

    /// Décalage de schéma entre la valeur stockée et le type demandé
    #[error("Failed to deserialize value for '{key}': {reason}")]
    DeserializationFailed { key: String, reason: String },

    /// Les clés d'une version ont été purgées mais l'index n'a pas pu être mis à jour.
    /// Le prochain sweep reprendra cette version.
    #[error("Version index not updated for version '{version}': {reason}")]
    InvalidRetentionState { version: String, reason: String },

    #[error("Invalid cache key: {reason}")]
    InvalidKey { reason: String },

    #[error("Invalid cache configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Cache operation '{operation}' timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl CacheError {
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheMiss { .. })
    }

    /// Erreurs de transport (store down, lent ou en erreur), par opposition aux erreurs de données
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_)
                | Self::StoreReadFailed { .. }
                | Self::StoreWriteFailed { .. }
                | Self::InvalidRetentionState { .. }
                | Self::Timeout { .. }
        )
    }
}
