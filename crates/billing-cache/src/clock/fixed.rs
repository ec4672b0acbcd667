// crates/billing-cache/src/clock/fixed.rs

use crate::clock::Clock;
use chrono::{DateTime, Utc};

/// Horloge figée, pour rendre l'ordre des versions déterministe dans les tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn at_nanos(nanos: i64) -> Self {
        Self(DateTime::from_timestamp_nanos(nanos))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
