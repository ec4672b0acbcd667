mod retention_worker;

pub use retention_worker::RetentionWorker;
