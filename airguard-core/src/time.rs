//! Time management for the daemon
//!
//! Provides clock abstraction so the tick logic never reads the clock itself:
//! - System clock (wall clock, used in production)
//! - Fixed clock (settable, used in tests and replays)

use core::time::Duration;

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of time for the system
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    ///
    /// Wall-clock alignment of the timers only produces a restart-stable
    /// schedule when this is true.
    fn is_wall_clock(&self) -> bool;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        true
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to an absolute time
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms` milliseconds, stopping at the end of the range
    pub fn advance(&mut self, ms: u64) {
        self.timestamp = self.timestamp.saturating_add(ms);
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }
}

/// Time elapsed from `earlier` to `later`, zero if the clock went backwards
pub fn elapsed(earlier: Timestamp, later: Timestamp) -> Duration {
    Duration::from_millis(later.saturating_sub(earlier))
}

/// Timestamp as floating point seconds, the representation used on the wire
pub fn as_epoch_seconds(timestamp: Timestamp) -> f64 {
    timestamp as f64 / 1000.0
}
