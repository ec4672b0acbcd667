// crates/billing-cache/src/domain/repositories/cache_store.rs

use crate::errors::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Curseur de départ d'un scan. Le scan est terminé quand le store renvoie à nouveau cette valeur.
pub const SCAN_START_CURSOR: &str = "0";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub keys: Vec<String>,
    pub next_cursor: String,
}

impl ScanPage {
    pub fn is_last(&self) -> bool {
        self.next_cursor == SCAN_START_CURSOR
    }
}

/// Primitives minimales attendues du key-value store sous-jacent.
///
/// Les clés reçues ici sont déjà namespacées : le store ne connaît pas la notion de version.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `ttl = None` : pas d'expiration
    async fn write(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()>;
    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;
    /// Idempotent : une clé absente n'est pas une erreur
    async fn delete_key(&self, key: &str) -> CacheResult<()>;
    /// Vide le store entier, toutes versions et tous processus confondus
    async fn delete_all(&self) -> CacheResult<()>;

    /// Sémantique "add-or-update-score" : un member n'apparaît qu'une fois
    async fn register_index_entry(&self, index_key: &str, member: &str, score: f64) -> CacheResult<()>;
    /// Members triés du score le plus haut au plus bas
    async fn list_index_descending(&self, index_key: &str) -> CacheResult<Vec<String>>;
    async fn remove_index_entry(&self, index_key: &str, member: &str) -> CacheResult<()>;

    async fn scan_keys_by_prefix(
        &self,
        prefix: &str,
        cursor: &str,
        page_size: u32,
    ) -> CacheResult<ScanPage>;
    /// Suppression en masse à récupération asynchrone (UNLINK), ou synchrone à défaut
    async fn bulk_delete_non_blocking(&self, keys: &[String]) -> CacheResult<()>;
}
