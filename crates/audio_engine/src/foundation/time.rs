//! Time management utilities
//!
//! The sound manager runs on a cooperative, frame-driven schedule. Time only
//! moves when the host advances it, which keeps reclamation deterministic.

/// Monotonic scheduler clock advanced once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerClock {
    now: f64,
    tick_count: u64,
}

impl SchedulerClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta` seconds and count one tick
    ///
    /// Negative or non-finite deltas count the tick without moving time.
    pub fn advance(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.now += f64::from(delta);
        }
        self.tick_count += 1;
    }

    /// Current scheduler time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of ticks observed so far
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

/// Deadline measured against a [`SchedulerClock`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    /// Time when the deadline was armed (seconds)
    pub armed_at: f64,
    /// Delay until the deadline fires (seconds)
    pub delay: f64,
}

impl Deadline {
    /// Arm a deadline `delay` seconds after `armed_at`
    pub fn new(armed_at: f64, delay: f64) -> Self {
        Self {
            armed_at,
            delay: delay.max(0.0),
        }
    }

    /// Check if the deadline has passed
    ///
    /// A zero delay fires on the first check at or after `armed_at`.
    pub fn is_due(&self, current_time: f64) -> bool {
        current_time >= self.armed_at + self.delay
    }

    /// Remaining time in seconds, never negative
    pub fn remaining(&self, current_time: f64) -> f64 {
        (self.armed_at + self.delay - current_time).max(0.0)
    }
}
