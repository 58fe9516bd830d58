//! Wall-clock aligned periodic timers
//!
//! Every timer fires on absolute multiples of its interval since the Unix
//! epoch rather than "start + n * interval". Two daemons restarted at
//! different moments on the same host therefore publish on the same
//! boundaries.
//!
//! A timer that is checked late (the tick was blocked for several seconds)
//! fires once and then re-aligns to the next future boundary. It never fires
//! repeatedly to catch up.

use core::time::Duration;

use crate::time::Timestamp;

/// Smallest timestamp `t >= now` with `t % interval == 0` (milliseconds)
///
/// Zero intervals are treated as 1ms; configuration rejects them before
/// they get here.
pub fn next_aligned_fire_time(interval: Duration, now: Timestamp) -> Timestamp {
    let step = interval_ms(interval);
    match now % step {
        0 => now,
        rem => now.saturating_add(step - rem),
    }
}

fn interval_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// One named periodic task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTimer {
    name: &'static str,
    interval: Duration,
    next_fire_at: Timestamp,
}

impl ScheduleTimer {
    /// Create a timer whose first fire is the first boundary at or after `now`
    pub fn new(name: &'static str, interval: Duration, now: Timestamp) -> Self {
        Self {
            name,
            interval,
            next_fire_at: next_aligned_fire_time(interval, now),
        }
    }

    /// Task name, used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next boundary this timer will fire on
    pub fn next_fire_at(&self) -> Timestamp {
        self.next_fire_at
    }

    /// Whether the timer's boundary has been reached
    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.next_fire_at
    }

    /// Move to the first boundary strictly after `now`
    ///
    /// Strictly after, so a tick that lands exactly on a boundary cannot see
    /// the same boundary as due again.
    pub fn advance(&mut self, now: Timestamp) {
        self.next_fire_at = next_aligned_fire_time(self.interval, now.saturating_add(1));
    }

    /// Check and, when due, advance in one step
    ///
    /// Returns true at most once per boundary crossed, however late `now` is.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if !self.is_due(now) {
            return false;
        }

        let missed = (now - self.next_fire_at) / interval_ms(self.interval);
        if missed > 0 {
            log::debug!(
                "{} timer {} intervals late, firing once and re-aligning",
                self.name,
                missed
            );
        }

        self.advance(now);
        true
    }

    /// Time left until the next fire (zero when already due)
    pub fn remaining(&self, now: Timestamp) -> Duration {
        Duration::from_millis(self.next_fire_at.saturating_sub(now))
    }
}
