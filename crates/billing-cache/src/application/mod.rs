pub mod cache;
pub mod workers;
