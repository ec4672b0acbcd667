// backend/services/billing/cache-janitor/src/main.rs

use billing_cache::errors::AppResult;
use billing_cache::infrastructure::bootstrap::run_retention_worker;

#[tokio::main]
async fn main() -> AppResult<()> {
    run_retention_worker("Billing").await
}
