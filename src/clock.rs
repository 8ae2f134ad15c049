//! Time source for date rules and lifecycle stamps.

use jiff::civil::Date;
use jiff::{Timestamp, Zoned};

/// Where the engine gets "now" from.
pub trait Clock {
    fn now(&self) -> Zoned;

    fn today(&self) -> Date {
        self.now().date()
    }

    fn timestamp(&self) -> Timestamp {
        self.now().timestamp()
    }
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock(Zoned);

impl FixedClock {
    pub fn new(at: Zoned) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.0.clone()
    }
}
