//! Time sources for audit stamps and operation timestamps.

use crate::Timestamp;
use chrono::{Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// A source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Held as nanoseconds since the epoch, so it covers 1677 through 2262.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `at`, to the nanosecond.
    pub fn new(at: Timestamp) -> Self {
        Self {
            nanos: AtomicI64::new(nanos(at)),
        }
    }

    /// Jump to `at`.
    pub fn set(&self, at: Timestamp) {
        self.nanos.store(nanos(at), Ordering::SeqCst);
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let step = by.num_nanoseconds().unwrap_or(i64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_add(step))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Utc.timestamp_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

// Out-of-range instants clamp to the representable bounds.
fn nanos(at: Timestamp) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(if at.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
