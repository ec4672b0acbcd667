// crates/billing-cache/src/domain/value_objects/mod.rs

mod cache_key;
mod cache_version;

pub use cache_key::{namespaced_key, version_prefix, CacheKey, CACHE_KEY_PREFIX, VERSION_INDEX_KEY};
pub use cache_version::CacheVersion;
