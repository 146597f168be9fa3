//! Clock abstraction shared by the ticker and the mode loops.
//!
//! Two time sources are exposed: a monotonic clock for measuring intervals
//! (pause lengths, stopwatch elapsed time) and a UTC wall clock for absolute
//! targets and display. [`ManualClock`] replaces both with virtual time so a whole
//! session can be scripted deterministically.

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic and wall-clock time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current monotonic instant, unaffected by wall-clock adjustments.
    fn monotonic(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The operating system clocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that only moves when told to.
///
/// Wall and monotonic time advance together. `sleep` advances the clock instead
/// of blocking.
#[derive(Debug)]
pub struct ManualClock {
    wall_start: DateTime<Utc>,
    mono_start: Instant,
    advanced: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock whose wall time starts at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            wall_start: start,
            mono_start: Instant::now(),
            advanced: Mutex::new(Duration::ZERO),
        }
    }

    /// Move both clocks forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut advanced = self.advanced.lock().unwrap_or_else(|e| e.into_inner());
        *advanced += duration;
    }

    fn offset(&self) -> Duration {
        *self.advanced.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let advanced =
            chrono::Duration::from_std(self.offset()).unwrap_or_else(|_| chrono::Duration::zero());
        self.wall_start + advanced
    }

    fn monotonic(&self) -> Instant {
        self.mono_start + self.offset()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Seconds since the Unix epoch as a float.
pub fn wall_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9
}

/// Fractional part of the second `time` falls in, in `[0, 1)`.
pub fn subsec_fraction(time: DateTime<Utc>) -> f64 {
    f64::from(time.timestamp_subsec_nanos()) / 1e9
}

/// Signed number of seconds from `from` to `to`.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

/// Convert a float number of seconds to a chrono duration (may be negative).
pub fn chrono_seconds(seconds: f64) -> chrono::Duration {
    chrono::Duration::microseconds((seconds * 1e6).round() as i64)
}
