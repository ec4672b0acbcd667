// crates/billing-cache/src/application/workers/retention_worker.rs

use crate::application::cache::{RetentionReport, VersionedCache};
use crate::errors::AppResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Job de maintenance : lance le sweep de rétention à intervalle régulier.
///
/// Plusieurs processus peuvent tourner en parallèle : chaque étape scan + delete est
/// idempotente, des sweeps concurrents font du travail en double mais restent corrects.
pub struct RetentionWorker {
    cache: Arc<VersionedCache>,
    interval: Duration,
}

impl RetentionWorker {
    pub fn new(cache: Arc<VersionedCache>, interval: Duration) -> Self {
        Self { cache, interval }
    }

    pub async fn run(&self, mut shutdown_signal: watch::Receiver<bool>) {
        tracing::info!(
            "Retention worker started (version '{}', interval {:?}, keep {})",
            self.cache.version(),
            self.interval,
            self.cache.config().retention_limit
        );

        loop {
            if *shutdown_signal.borrow() {
                break;
            }

            // Une erreur n'arrête pas le worker : la version reste dans l'index et sera reprise
            if let Err(e) = self.run_once().await {
                tracing::error!("Retention sweep error: {:?}", e);
            }

            tokio::select! {
                _ = sleep(self.interval) => {},
                _ = shutdown_signal.changed() => break,
            }
        }

        tracing::info!("Retention worker stopped gracefully");
    }

    pub async fn run_once(&self) -> AppResult<RetentionReport> {
        let report = self.cache.clean_oldest_version().await?;

        if !report.is_noop() {
            tracing::info!(
                "Purged {} cache version(s) {:?}, {} keys deleted",
                report.purged_versions.len(),
                report.purged_versions,
                report.deleted_keys
            );
        }
        if !report.dropped_entries.is_empty() {
            tracing::warn!("Dropped malformed index entries {:?}", report.dropped_entries);
        }

        Ok(report)
    }
}
