//! Fixed-interval poll gate
//!
//! The only state that survives between measurement cycles is the time of
//! the last refresh. The gate fires once `now - last >= interval` in
//! wrapping millisecond arithmetic and then advances `last` by exactly one
//! interval, so a late cycle does not shift the schedule.

/// Millisecond poll timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollTimer {
    interval_ms: u32,
    last_ms: u32,
}

impl PollTimer {
    pub const fn new(interval_ms: u32, start_ms: u32) -> Self {
        Self {
            interval_ms,
            last_ms: start_ms,
        }
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// True when a cycle is due; advances the schedule by one interval
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_ms) >= self.interval_ms {
            self.last_ms = self.last_ms.wrapping_add(self.interval_ms);
            true
        } else {
            false
        }
    }

    /// Milliseconds until the next cycle is due, zero if overdue
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        self.interval_ms
            .saturating_sub(now_ms.wrapping_sub(self.last_ms))
    }
}
