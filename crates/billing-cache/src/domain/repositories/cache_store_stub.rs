// crates/billing-cache/src/domain/repositories/cache_store_stub.rs

use crate::domain::repositories::{CacheStore, ScanPage, SCAN_START_CURSOR};
use crate::errors::{CacheError, CacheResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

const CURSOR_TAG: &str = "after:";

struct StoredValue {
    bytes: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Store en mémoire pour les tests : TTL, index trié, scan paginé et injection de pannes.
#[derive(Default)]
pub struct CacheStoreStub {
    storage: Mutex<HashMap<String, StoredValue>>,
    indexes: Mutex<HashMap<String, HashMap<String, f64>>>,
    latency: Mutex<Option<Duration>>,

    pub fail_all: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_index_removal: AtomicBool,

    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub bulk_deletes: AtomicUsize,
}

impl CacheStoreStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaque opération attend `latency` avant de répondre (`None` : réponse immédiate)
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock().unwrap_or_else(PoisonError::into_inner) = latency;
    }

    pub fn set_fail_all(&self, value: bool) {
        self.fail_all.store(value, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, value: bool) {
        self.fail_reads.store(value, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, value: bool) {
        self.fail_writes.store(value, Ordering::SeqCst);
    }

    pub fn set_fail_index_removal(&self, value: bool) {
        self.fail_index_removal.store(value, Ordering::SeqCst);
    }

    /// Clés vivantes (non expirées), triées
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .storage()
            .iter()
            .filter(|(_, v)| !v.is_expired())
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.storage().get(key).is_some_and(|v| !v.is_expired())
    }

    /// Écrit directement des octets bruts, sans passer par la sérialisation
    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        self.storage().insert(
            key.to_string(),
            StoredValue {
                bytes: bytes.to_vec(),
                expires_at: None,
            },
        );
    }

    pub fn index_members(&self, index_key: &str) -> Vec<String> {
        Self::sorted_desc(self.indexes().get(index_key))
    }

    pub fn index_score(&self, index_key: &str, member: &str) -> Option<f64> {
        self.indexes().get(index_key).and_then(|set| set.get(member).copied())
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, StoredValue>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn indexes(&self) -> MutexGuard<'_, HashMap<String, HashMap<String, f64>>> {
        self.indexes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Même ordre que ZREVRANGE : score décroissant, puis member décroissant à score égal
    fn sorted_desc(set: Option<&HashMap<String, f64>>) -> Vec<String> {
        let Some(set) = set else {
            return Vec::new();
        };
        let mut entries: Vec<(&String, &f64)> = set.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| b.0.cmp(a.0)));
        entries.into_iter().map(|(m, _)| m.clone()).collect()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check_available(&self) -> CacheResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(CacheError::StoreUnavailable("Cache Down".into()));
        }
        Ok(())
    }

    fn check_read(&self, key: &str) -> CacheResult<()> {
        self.check_available()?;
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::StoreReadFailed {
                key: key.to_string(),
                reason: "injected read failure".into(),
            });
        }
        Ok(())
    }

    fn check_write(&self, key: &str) -> CacheResult<()> {
        self.check_available()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::StoreWriteFailed {
                key: key.to_string(),
                reason: "injected write failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for CacheStoreStub {
    async fn write(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.simulate_latency().await;
        self.check_write(key)?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        self.storage().insert(
            key.to_string(),
            StoredValue {
                bytes: value.to_vec(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn read(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.simulate_latency().await;
        self.check_read(key)?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let mut storage = self.storage();
        if storage.get(key).is_some_and(StoredValue::is_expired) {
            storage.remove(key);
            return Ok(None);
        }
        Ok(storage.get(key).map(|v| v.bytes.clone()))
    }

    async fn delete_key(&self, key: &str) -> CacheResult<()> {
        self.simulate_latency().await;
        self.check_write(key)?;
        self.storage().remove(key);
        Ok(())
    }

    async fn delete_all(&self) -> CacheResult<()> {
        self.simulate_latency().await;
        self.check_write("*")?;
        self.storage().clear();
        self.indexes().clear();
        Ok(())
    }

    async fn register_index_entry(&self, index_key: &str, member: &str, score: f64) -> CacheResult<()> {
        self.simulate_latency().await;
        self.check_write(index_key)?;
        self.indexes()
            .entry(index_key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn list_index_descending(&self, index_key: &str) -> CacheResult<Vec<String>> {
        self.simulate_latency().await;
        self.check_read(index_key)?;
        Ok(Self::sorted_desc(self.indexes().get(index_key)))
    }

    async fn remove_index_entry(&self, index_key: &str, member: &str) -> CacheResult<()> {
        self.simulate_latency().await;
        self.check_write(index_key)?;
        if self.fail_index_removal.load(Ordering::SeqCst) {
            return Err(CacheError::StoreWriteFailed {
                key: index_key.to_string(),
                reason: "injected index removal failure".into(),
            });
        }

        let mut indexes = self.indexes();
        if let Some(set) = indexes.get_mut(index_key) {
            set.remove(member);
            if set.is_empty() {
                indexes.remove(index_key);
            }
        }
        Ok(())
    }

    async fn scan_keys_by_prefix(
        &self,
        prefix: &str,
        cursor: &str,
        page_size: u32,
    ) -> CacheResult<ScanPage> {
        self.simulate_latency().await;
        self.check_read(prefix)?;

        // Curseur = dernière clé rendue : les clés supprimées entre deux pages ne décalent rien
        let after = match cursor {
            SCAN_START_CURSOR => None,
            other => Some(other.strip_prefix(CURSOR_TAG).ok_or_else(|| {
                CacheError::StoreReadFailed {
                    key: prefix.to_string(),
                    reason: format!("invalid scan cursor '{other}'"),
                }
            })?),
        };

        let mut remaining = self
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .filter(|k| after.map_or(true, |last| k.as_str() > last));

        let keys: Vec<String> = remaining.by_ref().take(page_size.max(1) as usize).collect();
        let next_cursor = match (keys.last(), remaining.next()) {
            (Some(last), Some(_)) => format!("{CURSOR_TAG}{last}"),
            _ => SCAN_START_CURSOR.to_string(),
        };

        Ok(ScanPage { keys, next_cursor })
    }

    async fn bulk_delete_non_blocking(&self, keys: &[String]) -> CacheResult<()> {
        self.simulate_latency().await;
        self.check_write("bulk")?;
        self.bulk_deletes.fetch_add(1, Ordering::SeqCst);

        let mut storage = self.storage();
        for key in keys {
            storage.remove(key);
        }
        Ok(())
    }
}
