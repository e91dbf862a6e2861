//! Clock Port (Driven Port)
//!
//! Source of "now" for use cases, so stage end dates and event times can be
//! pinned in tests.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::shared::Timestamp;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;

    /// Current calendar day.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(Utc::now())
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.0)
    }
}
