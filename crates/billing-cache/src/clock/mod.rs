// crates/billing-cache/src/clock/mod.rs

mod fixed;
mod system;

pub use fixed::FixedClock;
pub use system::SystemClock;

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Horodatage en nanosecondes depuis l'epoch, utilisé comme score de l'index des versions.
    fn now_nanos(&self) -> i64 {
        let now = self.now();
        now.timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
    }
}
