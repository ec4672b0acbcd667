// crates/billing-cache/src/infrastructure/concurrency/singleflight.rs

//! # Singleflight - Déduplication de requêtes concurrentes
//!
//! Ce module implémente le pattern **Singleflight** : une seule instance d'une opération
//! asynchrone est en cours pour une clé donnée.
//!
//! ### Cas d'usage principal : le "Cache Stampede"
//! Quand un rapport coûteux expire et que 1000 requêtes le demandent en même temps, au lieu de
//! lancer 1000 agrégations, `Singleflight` va :
//! 1. Exécuter le calcul pour le premier appelant (le leader).
//! 2. Faire attendre les 999 autres sur le même résultat.
//! 3. Distribuer le résultat final à tout le monde une fois le calcul terminé.
//!
//! L'entrée est retirée de la map même si le leader est annulé en cours de route : les
//! suiveurs reçoivent alors une erreur et l'appel suivant élit un nouveau leader.

use crate::errors::{AppError, AppResult, ErrorCode};
use dashmap::DashMap;
use futures::future::{FutureExt, Shared};
use std::future::Future;
use std::hash::Hash;
use tokio::sync::oneshot;

type InFlight<T> = Shared<oneshot::Receiver<AppResult<T>>>;

pub struct Singleflight<K, T>
where
    K: Hash + Eq,
{
    requests: DashMap<K, InFlight<T>>,
}

impl<K, T> Default for Singleflight<K, T>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self {
            requests: DashMap::new(),
        }
    }
}

/// Retire la clé à la fin du travail du leader, y compris sur annulation
struct LeaderGuard<'a, K, T>
where
    K: Hash + Eq,
{
    requests: &'a DashMap<K, InFlight<T>>,
    key: Option<K>,
}

impl<K, T> Drop for LeaderGuard<'_, K, T>
where
    K: Hash + Eq,
{
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.requests.remove(&key);
        }
    }
}

impl<K, T> Singleflight<K, T>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Nombre de clés dont le calcul est en cours
    pub fn in_flight(&self) -> usize {
        self.requests.len()
    }

    pub async fn execute<F, Fut>(&self, key: K, factory: F) -> AppResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        use dashmap::mapref::entry::Entry;

        // Check-and-insert ATOMIQUE via Entry
        let shared_fut = match self.requests.entry(key.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let (tx, rx) = oneshot::channel();
                entry.insert(rx.shared());

                // Le verrou DashMap est relâché ici, avant le .await
                let _guard = LeaderGuard {
                    requests: &self.requests,
                    key: Some(key),
                };

                let result = factory().await;
                let _ = tx.send(result.clone());

                return result;
            }
        };

        // Suiveur : on attend le résultat du leader
        match shared_fut.await {
            Ok(result) => result,
            Err(_) => Err(AppError::new(
                ErrorCode::InternalError,
                "Singleflight leader panicked or dropped",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_execution() {
        let sf = Arc::new(Singleflight::<String, u64>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let sf = Arc::clone(&sf);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                sf.execute("report".to_string(), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(42)
                })
                .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sf.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_error_is_shared_and_not_retained() {
        let sf = Singleflight::<String, u64>::new();

        let first = sf
            .execute("k".to_string(), || async {
                Err(AppError::new(ErrorCode::InternalError, "boom"))
            })
            .await;
        assert!(first.is_err());

        let second = sf.execute("k".to_string(), || async { Ok(7) }).await;
        assert_eq!(second.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_cancelled_leader_releases_the_key() {
        let sf = Arc::new(Singleflight::<String, u64>::new());

        let leader = {
            let sf = Arc::clone(&sf);
            tokio::spawn(async move {
                sf.execute("k".to_string(), || async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(1)
                })
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(sf.in_flight(), 1);

        leader.abort();
        let _ = leader.await;

        assert_eq!(sf.in_flight(), 0);
        let next = sf.execute("k".to_string(), || async { Ok(2) }).await;
        assert_eq!(next.unwrap(), 2);
    }
}
