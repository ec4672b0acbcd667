// crates/billing-cache/tests/infrastructure/mod.rs

mod cached_query_executor_it;
mod redis_cache_store_it;
mod versioned_cache_it;
