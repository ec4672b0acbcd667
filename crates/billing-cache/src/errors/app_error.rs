use crate::errors::{CacheError, ErrorCode};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<CacheError> for AppError {
    fn from(error: CacheError) -> Self {
        match error {
            // 1. Cas : absence de valeur, l'appelant doit retomber sur la source de vérité
            CacheError::CacheMiss { ref key } => {
                Self::new(ErrorCode::NotFound, error.to_string())
                    .with_details(serde_json::json!({ "key": key }))
            }

            // 2. Cas : store injoignable ou trop lent
            CacheError::StoreUnavailable(_) | CacheError::Timeout { .. } => {
                Self::new(ErrorCode::ServiceUnavailable, error.to_string())
            }

            // 3. Cas : erreurs transitoires du store, le retry est à la charge de l'appelant
            CacheError::StoreReadFailed { ref key, .. }
            | CacheError::StoreWriteFailed { ref key, .. } => {
                Self::new(ErrorCode::InfrastructureFailure, error.to_string())
                    .with_details(serde_json::json!({ "key": key }))
            }

            CacheError::InvalidRetentionState { ref version, .. } => {
                Self::new(ErrorCode::InfrastructureFailure, error.to_string())
                    .with_details(serde_json::json!({ "version": version }))
            }

            // 4. Cas : bug ou décalage de schéma entre deux versions
            CacheError::SerializationFailed { ref key, .. }
            | CacheError::DeserializationFailed { ref key, .. } => {
                Self::new(ErrorCode::InternalError, error.to_string())
                    .with_details(serde_json::json!({ "key": key }))
            }

            CacheError::InvalidKey { .. } | CacheError::InvalidConfig { .. } => {
                Self::new(ErrorCode::ValidationFailed, error.to_string())
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
