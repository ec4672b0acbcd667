// crates/billing-cache/src/application/cache/cached_query_executor.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::application::cache::{VersionedCache, WriteBackPolicy};
use crate::errors::AppResult;
#[cfg(feature = "concurrency")]
use crate::infrastructure::concurrency::Singleflight;

/// Décorateur cache-aside autour d'un calcul coûteux (agrégations de rapports, dashboards).
///
/// Aucune déduplication ici : deux appels concurrents sur une même clé en miss calculent
/// tous les deux et écrivent tous les deux (last-writer-wins). Voir [`CoalescingQueryExecutor`].
#[derive(Clone)]
pub struct CachedQueryExecutor {
    cache: Arc<VersionedCache>,
    policy: WriteBackPolicy,
}

impl CachedQueryExecutor {
    /// La politique d'écriture est reprise de la configuration du cache
    pub fn new(cache: Arc<VersionedCache>) -> Self {
        let policy = cache.config().write_back_policy;
        Self { cache, policy }
    }

    pub fn with_policy(mut self, policy: WriteBackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> WriteBackPolicy {
        self.policy
    }

    pub fn cache(&self) -> &Arc<VersionedCache> {
        &self.cache
    }

    /// `ttl = 0` désactive le cache pour cet appel : `compute` est toujours exécuté.
    pub async fn execute_cached<T, F, Fut>(
        &self,
        cache_key: &str,
        ttl: Duration,
        compute: F,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let caching = !ttl.is_zero();

        // 1. TENTATIVE CACHE (Fast Path)
        // Une panne du cache ne doit jamais bloquer le chemin principal : on retombe sur le calcul
        if caching {
            match self.cache.get::<T>(cache_key).await {
                Ok(cached) => {
                    tracing::debug!("Cache hit for {}", cache_key);
                    return Ok(cached);
                }
                Err(e) if e.is_cache_miss() => {
                    tracing::debug!("Cache miss for {}", cache_key);
                }
                Err(e) => {
                    tracing::warn!("⚠️ Cache read failed for {}, recomputing: {}", cache_key, e);
                }
            }
        }

        // 2. CALCUL (les erreurs remontent telles quelles et ne sont jamais mises en cache)
        let result = compute().await?;

        // 3. WRITE-BACK
        if caching {
            if let Err(e) = self.cache.set(cache_key, &result, ttl).await {
                match self.policy {
                    WriteBackPolicy::Strict => {
                        tracing::error!("❌ Cache write-back failed for {}: {}", cache_key, e);
                        return Err(e.into());
                    }
                    WriteBackPolicy::BestEffort => {
                        tracing::warn!(
                            "⚠️ Cache write-back failed for {}, returning uncached result: {}",
                            cache_key,
                            e
                        );
                    }
                }
            }
        }

        Ok(result)
    }
}

/// Couche single-flight au-dessus de [`CachedQueryExecutor`] : les appels concurrents sur une
/// même clé attendent le calcul du premier au lieu de relancer l'agrégation (cache stampede).
///
/// Un exécuteur par type de résultat, la déduplication est locale au processus.
#[cfg(feature = "concurrency")]
pub struct CoalescingQueryExecutor<T> {
    executor: CachedQueryExecutor,
    in_flight: Singleflight<String, T>,
}

#[cfg(feature = "concurrency")]
impl<T> CoalescingQueryExecutor<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new(executor: CachedQueryExecutor) -> Self {
        Self {
            executor,
            in_flight: Singleflight::new(),
        }
    }

    pub async fn execute_cached<F, Fut>(
        &self,
        cache_key: &str,
        ttl: Duration,
        compute: F,
    ) -> AppResult<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let executor = self.executor.clone();
        let key = cache_key.to_string();

        self.in_flight
            .execute(cache_key.to_string(), move || async move {
                executor.execute_cached(&key, ttl, compute).await
            })
            .await
    }
}
