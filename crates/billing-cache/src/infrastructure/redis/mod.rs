pub mod factories;
pub mod repositories;
pub mod utils;
