mod cache_store;
mod cache_store_stub;

pub use cache_store::{CacheStore, ScanPage, SCAN_START_CURSOR};
pub use cache_store_stub::CacheStoreStub;
