use crate::errors::{AppError, CacheError};

/// RESULT DU CACHE (Interne)
/// Utilisé par : le port CacheStore, ses adaptateurs et le VersionedCache.
/// Il garde la taxonomie fine (miss, sérialisation, store) visible pour l'appelant.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// RESULT D'APPLICATION (Exécutable)
/// Utilisé par : l'exécuteur de requêtes, les workers, le bootstrap.
/// Il permet de manipuler les erreurs du calcul métier et du cache dans un même type.
pub type AppResult<T> = std::result::Result<T, AppError>;
