// crates/billing-cache/tests/infrastructure/cached_query_executor_it.rs

use billing_cache::application::cache::{CacheConfig, CachedQueryExecutor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use crate::common::{build_cache, setup_redis_test_cache};

#[tokio::test]
async fn test_report_is_computed_once_then_served_from_redis() {
    let ctx = setup_redis_test_cache().await;
    let cache = Arc::new(build_cache(&ctx, "v1", 100, CacheConfig::default()).await);
    let executor = CachedQueryExecutor::new(cache);
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let calls = Arc::clone(&calls);
        let totals = executor
            .execute_cached("vat:report:2024-Q4", Duration::from_secs(60), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![("FR".to_string(), 20_i64), ("DE".to_string(), 19_i64)])
            })
            .await
            .unwrap();
        assert_eq!(totals.len(), 2);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
