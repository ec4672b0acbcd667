mod redis_cache_store;

pub use redis_cache_store::RedisCacheStore;
