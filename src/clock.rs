//! Defines the [`Clock`] capability used to resolve the `now` token in
//! date-range expressions. The current time is an injected dependency
//! rather than a hidden global so that callers (and tests) can evaluate
//! expressions against a fixed instant.

use chrono::{Local, NaiveDateTime};

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the instant it was constructed with. Useful for
/// reproducible builds and for tests.
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
