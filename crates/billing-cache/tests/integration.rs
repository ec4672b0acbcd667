// crates/billing-cache/tests/integration.rs

mod common;
mod infrastructure;
