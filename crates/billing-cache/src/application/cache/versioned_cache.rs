// crates/billing-cache/src/application/cache/versioned_cache.rs

//! # VersionedCache - Cache clé/valeur namespacé par version de déploiement
//!
//! Chaque clé logique est stockée sous `cache:<version>:<key>`. La version est fixée à la
//! construction et enregistrée dans le sorted set `cache:versions` (score = horodatage ns).
//!
//! ### Pourquoi versionner ?
//! Un déploiement N+1 démarre avec une nouvelle version : il ne voit plus les valeurs de N
//! (dont le schéma a pu changer) sans qu'on ait besoin d'un FLUSH bloquant. Les clés de N
//! restent lisibles par les processus N encore en vie jusqu'au passage du sweep de rétention,
//! qui ne garde que les `retention_limit` versions les plus récentes.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::cache::CacheConfig;
use crate::clock::{Clock, SystemClock};
use crate::domain::repositories::{CacheStore, SCAN_START_CURSOR};
use crate::domain::value_objects::{version_prefix, CacheKey, CacheVersion, VERSION_INDEX_KEY};
use crate::errors::{CacheError, CacheResult};

/// Bilan d'un passage du sweep de rétention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetentionReport {
    /// Versions purgées, dans l'ordre de traitement (de la plus récente à la plus ancienne)
    pub purged_versions: Vec<String>,
    pub deleted_keys: usize,
    /// Entrées d'index mal formées retirées sans toucher aux clés
    pub dropped_entries: Vec<String>,
}

impl RetentionReport {
    pub fn is_noop(&self) -> bool {
        self.purged_versions.is_empty() && self.dropped_entries.is_empty()
    }
}

pub struct VersionedCacheBuilder {
    store: Arc<dyn CacheStore>,
    version: CacheVersion,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl VersionedCacheBuilder {
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Enregistre la version dans l'index. Sans cet enregistrement le sweep ne pourrait pas
    /// découvrir la version active, le cache n'est donc pas construit si l'écriture échoue.
    pub async fn build(self) -> CacheResult<VersionedCache> {
        self.config.validate()?;

        let cache = VersionedCache {
            store: self.store,
            version: self.version,
            config: self.config,
        };

        let score = self.clock.now_nanos() as f64;
        cache
            .guarded(
                "register_version",
                cache
                    .store
                    .register_index_entry(VERSION_INDEX_KEY, cache.version.as_str(), score),
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    "❌ Unable to register cache version '{}': {}",
                    cache.version,
                    e
                );
                CacheError::StoreUnavailable(format!(
                    "failed to register cache version '{}': {}",
                    cache.version, e
                ))
            })?;

        tracing::info!("✅ Cache version '{}' registered", cache.version);
        Ok(cache)
    }
}

pub struct VersionedCache {
    store: Arc<dyn CacheStore>,
    version: CacheVersion,
    config: CacheConfig,
}

impl VersionedCache {
    pub fn builder(store: Arc<dyn CacheStore>, version: CacheVersion) -> VersionedCacheBuilder {
        VersionedCacheBuilder {
            store,
            version,
            config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn version(&self) -> &CacheVersion {
        &self.version
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// `ttl = 0` : la valeur n'expire jamais
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let full_key = self.full_key(key)?;

        let payload = serde_json::to_vec(value).map_err(|e| {
            tracing::error!("❌ Cache serialization failed for {}: {}", full_key, e);
            CacheError::SerializationFailed {
                key: full_key.clone(),
                reason: e.to_string(),
            }
        })?;

        let expiration = (!ttl.is_zero()).then_some(ttl);
        self.guarded("write", self.store.write(&full_key, &payload, expiration))
            .await
    }

    /// Renvoie `CacheError::CacheMiss` si la clé est absente ou expirée
    pub async fn get<T>(&self, key: &str) -> CacheResult<T>
    where
        T: DeserializeOwned,
    {
        let full_key = self.full_key(key)?;

        let payload = self
            .guarded("read", self.store.read(&full_key))
            .await?
            .ok_or_else(|| CacheError::CacheMiss {
                key: full_key.clone(),
            })?;

        // Une valeur illisible signale un décalage de schéma : jamais ignorée
        serde_json::from_slice(&payload).map_err(|e| {
            tracing::error!("❌ Cache deserialization failed for {}: {}", full_key, e);
            CacheError::DeserializationFailed {
                key: full_key,
                reason: e.to_string(),
            }
        })
    }

    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let full_key = self.full_key(key)?;
        self.guarded("delete", self.store.delete_key(&full_key)).await
    }

    /// Vide TOUT le store (toutes versions, tous processus). Réservé aux tests et à la maintenance.
    ///
    /// Best-effort : l'échec est loggé et renvoyé, l'appelant est libre de l'ignorer.
    pub async fn flush_all(&self) -> CacheResult<()> {
        tracing::warn!("🧹 Flushing the whole cache store (requested by version '{}')", self.version);

        let result = self.guarded("flush_all", self.store.delete_all()).await;
        if let Err(e) = &result {
            tracing::warn!("⚠️ Cache flush failed: {}", e);
        }
        result
    }

    /// Purge les versions au-delà de `retention_limit` (les plus anciennes).
    ///
    /// S'arrête à la première erreur. Un sweep interrompu laisse l'entrée d'index de la version
    /// en place : le sweep suivant reprendra les clés restantes.
    pub async fn clean_oldest_version(&self) -> CacheResult<RetentionReport> {
        let versions = self
            .guarded("list_versions", self.store.list_index_descending(VERSION_INDEX_KEY))
            .await?;

        let limit = self.config.retention_limit;
        if versions.len() <= limit {
            tracing::debug!(
                "Retention sweep: {} version(s) known, limit {}, nothing to purge",
                versions.len(),
                limit
            );
            return Ok(RetentionReport::default());
        }

        let mut report = RetentionReport::default();

        for member in &versions[limit..] {
            // L'index est partagé : un member qui n'est pas un label valide produirait un
            // préfixe de scan qui déborde sur les versions retenues.
            let version = match CacheVersion::try_new(member.as_str()) {
                Ok(v) if v.as_str() == member => Some(v),
                Ok(_) => {
                    tracing::warn!("⚠️ Index entry '{}' is not a canonical cache version, keys left untouched", member);
                    None
                }
                Err(e) => {
                    tracing::warn!("⚠️ Index entry '{}' rejected ({}), keys left untouched", member, e);
                    None
                }
            };

            let deleted = match &version {
                Some(v) => self.purge_version_keys(v).await?,
                None => 0,
            };

            self.guarded(
                "remove_version",
                self.store.remove_index_entry(VERSION_INDEX_KEY, member),
            )
            .await
            .map_err(|e| CacheError::InvalidRetentionState {
                version: member.clone(),
                reason: e.to_string(),
            })?;

            if version.is_none() {
                report.dropped_entries.push(member.clone());
                continue;
            }

            tracing::info!(
                "🗑️ Cache version '{}' purged ({} keys)",
                member,
                deleted
            );
            report.purged_versions.push(member.clone());
            report.deleted_keys += deleted;
        }

        Ok(report)
    }

    async fn purge_version_keys(&self, version: &CacheVersion) -> CacheResult<usize> {
        let prefix = version_prefix(version.as_str());
        let mut cursor = SCAN_START_CURSOR.to_string();
        let mut deleted = 0;

        loop {
            let page = self
                .guarded(
                    "scan",
                    self.store
                        .scan_keys_by_prefix(&prefix, &cursor, self.config.scan_page_size),
                )
                .await?;

            if !page.keys.is_empty() {
                self.guarded("bulk_delete", self.store.bulk_delete_non_blocking(&page.keys))
                    .await?;
                deleted += page.keys.len();
            }

            if page.is_last() {
                break;
            }
            cursor = page.next_cursor;
        }

        Ok(deleted)
    }

    fn full_key(&self, key: &str) -> CacheResult<String> {
        Ok(CacheKey::try_new(key)?.namespaced(&self.version))
    }

    async fn guarded<T, F>(&self, operation: &'static str, fut: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        let timeout = self.config.operation_timeout;
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("⏱️ Cache operation '{}' timed out after {:?}", operation, timeout);
                Err(CacheError::Timeout { operation, timeout })
            }
        }
    }
}
