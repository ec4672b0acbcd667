// crates/billing-cache/src/lib.rs

pub mod application;
pub mod clock;
pub mod domain;
pub mod errors;
pub mod infrastructure;
