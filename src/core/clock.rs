use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use chrono::{DateTime, Utc};

/// Time source for attempt timing.
///
/// `now_ms` is a monotonic offset from the clock origin; `wall_clock_ms` is
/// Unix epoch milliseconds and is only used as the event timestamp.
pub trait Clock {
    fn now_ms(&self) -> f64;
    fn wall_clock_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }

    fn wall_clock_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Deterministic clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    offset_ms: Rc<Cell<f64>>,
    epoch: DateTime<Utc>,
}

impl ManualClock {
    #[must_use]
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            offset_ms: Rc::new(Cell::new(0.0)),
            epoch,
        }
    }

    pub fn advance_ms(&self, delta_ms: f64) {
        self.offset_ms.set(self.offset_ms.get() + delta_ms);
    }

    pub fn set_ms(&self, offset_ms: f64) {
        self.offset_ms.set(offset_ms);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.offset_ms.get()
    }

    fn wall_clock_ms(&self) -> i64 {
        self.epoch.timestamp_millis() + self.offset_ms.get() as i64
    }
}
