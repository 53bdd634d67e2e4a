//! Clock implementations

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use crate::ports::Clock;

/// Wall clock; "today" is the local calendar date
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually controlled clock for tests
///
/// Every call to `now` advances the clock by `tick` (zero by default), so
/// records created in sequence get distinct timestamps when needed.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
    tick: Duration,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            tick: Duration::zero(),
        }
    }

    /// Advance by `tick` after each `now()` call
    pub fn ticking(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }

    fn current(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(mut now) => {
                let current = *now;
                *now += self.tick;
                current
            }
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn today(&self) -> NaiveDate {
        self.current().date_naive()
    }
}
