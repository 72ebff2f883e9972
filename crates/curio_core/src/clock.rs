//! Time sources.
//!
//! Cache freshness is measured on a monotonic [`Instant`]; record timestamps are
//! wall-clock milliseconds since the Unix epoch. Both come from the same [`Clock`]
//! so tests can move them together.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Monotonic time, used for freshness windows.
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch, used for record timestamps.
    fn now_millis(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// # Example
///
/// ```
/// use curio_core::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new(1_000);
/// let before = clock.now();
/// clock.advance(Duration::from_secs(61));
///
/// assert_eq!(clock.now() - before, Duration::from_secs(61));
/// assert_eq!(clock.now_millis(), 62_000);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    start_millis: i64,
    offset_millis: AtomicU64,
}

impl ManualClock {
    /// Create a clock whose wall-clock time starts at `start_millis`.
    pub fn new(start_millis: i64) -> Self {
        Self {
            base: Instant::now(),
            start_millis,
            offset_millis: AtomicU64::new(0),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.offset_millis.fetch_add(millis, Ordering::SeqCst);
    }

    fn offset(&self) -> u64 {
        self.offset_millis.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset())
    }

    fn now_millis(&self) -> i64 {
        self.start_millis
            .saturating_add(i64::try_from(self.offset()).unwrap_or(i64::MAX))
    }
}
