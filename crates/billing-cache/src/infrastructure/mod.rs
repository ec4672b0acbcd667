// crates/billing-cache/src/infrastructure/mod.rs

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub mod bootstrap;

#[cfg(feature = "concurrency")]
pub mod concurrency;
