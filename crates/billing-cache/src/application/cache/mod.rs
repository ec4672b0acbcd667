// crates/billing-cache/src/application/cache/mod.rs

mod cache_config;
mod cached_query_executor;
mod versioned_cache;

pub use cache_config::{CacheConfig, WriteBackPolicy};
#[cfg(feature = "concurrency")]
pub use cached_query_executor::CoalescingQueryExecutor;
pub use cached_query_executor::CachedQueryExecutor;
pub use versioned_cache::{RetentionReport, VersionedCache, VersionedCacheBuilder};
