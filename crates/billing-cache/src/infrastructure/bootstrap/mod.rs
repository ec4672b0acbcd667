mod retention;

pub use retention::{
    init_tracing, parse_retention_interval, run_retention_worker, DEFAULT_RETENTION_INTERVAL_SECS,
};
