// crates/billing-cache/tests/common/mod.rs

mod setup_redis_test_cache;

pub use setup_redis_test_cache::{build_cache, setup_redis_test_cache};
