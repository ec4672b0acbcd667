// crates/billing-cache/src/infrastructure/bootstrap/retention.rs

use crate::application::cache::CacheConfig;
use crate::application::workers::RetentionWorker;
use crate::domain::value_objects::CacheVersion;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::infrastructure::redis::factories::{create_versioned_cache, RedisConfig};
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` si défini, `info` sinon
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub const DEFAULT_RETENTION_INTERVAL_SECS: u64 = 300;

/// Intervalle entre deux sweeps, en secondes. Absent : 300. Zéro ou non numérique : erreur.
pub fn parse_retention_interval(raw: Option<&str>) -> AppResult<Duration> {
    let secs = match raw {
        None => DEFAULT_RETENTION_INTERVAL_SECS,
        Some(value) => value.trim().parse::<u64>().map_err(|_| {
            AppError::new(
                ErrorCode::ValidationFailed,
                format!("Invalid CACHE_RETENTION_INTERVAL_SECS: '{}'", value),
            )
        })?,
    };

    if secs == 0 {
        return Err(AppError::new(
            ErrorCode::ValidationFailed,
            "CACHE_RETENTION_INTERVAL_SECS must be at least 1",
        ));
    }

    Ok(Duration::from_secs(secs))
}

pub async fn run_retention_worker(service_name: &str) -> AppResult<()> {
    // 1. Initialisation des logs
    init_tracing();
    tracing::info!("🚀 Starting {} cache retention worker...", service_name);

    // 2. Configuration via Environnement (avec valeurs par défaut)
    let version = env::var("CACHE_VERSION")
        .map_err(|_| AppError::new(ErrorCode::ValidationFailed, "CACHE_VERSION must be set"))?;
    let version = CacheVersion::try_new(version)?;

    let interval = parse_retention_interval(env::var("CACHE_RETENTION_INTERVAL_SECS").ok().as_deref())?;

    let redis_config = RedisConfig::from_env()?;
    let cache_config = CacheConfig::from_env()?;

    // 3. Montage de l'infrastructure (la version du janitor est enregistrée comme les autres)
    let cache = create_versioned_cache(&redis_config, version, cache_config).await?;
    let worker = RetentionWorker::new(cache, interval);

    // 4. Signal d'arrêt (Graceful Shutdown)
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("🛑 Shutdown signal received, stopping retention worker...");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                tracing::error!("❌ Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    tracing::info!("✅ Retention worker active (interval: {}s)", interval.as_secs());

    // 5. Exécution
    worker.run(shutdown_rx).await;

    tracing::info!("👋 {} cache retention worker exited clean", service_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_defaults_when_unset() {
        assert_eq!(parse_retention_interval(None).unwrap(), Duration::from_secs(300));
    }

    #[test]
    fn test_interval_is_parsed() {
        assert_eq!(parse_retention_interval(Some(" 60 ")).unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = parse_retention_interval(Some("0")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_malformed_interval_is_rejected() {
        for raw in ["", "five", "-3", "1.5"] {
            let err = parse_retention_interval(Some(raw)).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed, "input {raw:?}");
        }
    }
}
