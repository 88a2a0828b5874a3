//! Tick cadence bookkeeping
//!
//! The read loop paces itself on a nominal ~1 s tick so keepalive behaviour
//! stays independent of the data arrival rate. Every wait is computed against
//! a fixed anchor (the last source-open time), so drift from slow reads or OS
//! scheduling does not accumulate across iterations.

use std::time::{Duration, Instant};

/// Nominal tick period.
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Safety margin subtracted from every remaining-wait computation so a wait
/// never oversleeps past the tick boundary.
pub const GUARD_MICROS: i64 = 500;

/// Tracks the last tick anchor and computes the remaining wait until the next
/// nominal boundary.
#[derive(Debug, Clone, Copy)]
pub struct CadenceClock {
    last_tick: Instant,
    period: Duration,
}

impl CadenceClock {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        CadenceClock { last_tick: Instant::now(), period }
    }

    /// Re-anchor the cadence. Called once per source open, never inside the
    /// read loop, so reads free-run once the first boundary has passed.
    pub fn anchor(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Signed microseconds until the next tick boundary, minus the guard
    /// margin. A non-positive result means "do not wait; poll immediately".
    #[must_use]
    pub fn remaining_micros(&self, now: Instant) -> i64 {
        let boundary = self.last_tick + self.period;
        let signed = if now < boundary {
            i64::try_from((boundary - now).as_micros()).unwrap_or(i64::MAX)
        } else {
            i64::try_from((now - boundary).as_micros())
                .map(i64::wrapping_neg)
                .unwrap_or(i64::MIN)
        };
        signed.saturating_sub(GUARD_MICROS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_positive_before_boundary() {
        let mut clock = CadenceClock::new(TICK_PERIOD);
        let now = Instant::now();
        clock.anchor(now);

        let remaining = clock.remaining_micros(now);
        assert!(remaining > 0);
        // One full period out, less the guard
        assert_eq!(remaining, 1_000_000 - GUARD_MICROS);
    }

    #[test]
    fn test_remaining_nonpositive_at_boundary() {
        let mut clock = CadenceClock::new(TICK_PERIOD);
        let now = Instant::now();
        clock.anchor(now);

        assert!(clock.remaining_micros(now + TICK_PERIOD) <= 0);
    }

    #[test]
    fn test_remaining_negative_past_boundary() {
        let mut clock = CadenceClock::new(TICK_PERIOD);
        let now = Instant::now();
        clock.anchor(now);

        let remaining = clock.remaining_micros(now + 3 * TICK_PERIOD);
        assert!(remaining < 0);
    }

    #[test]
    fn test_guard_margin_applies_inside_final_window() {
        let mut clock = CadenceClock::new(TICK_PERIOD);
        let now = Instant::now();
        clock.anchor(now);

        // 200µs before the boundary is inside the 500µs guard window
        let just_before = now + TICK_PERIOD - Duration::from_micros(200);
        assert!(clock.remaining_micros(just_before) <= 0);
    }

    #[test]
    fn test_anchor_resets_cadence() {
        let mut clock = CadenceClock::new(TICK_PERIOD);
        let start = Instant::now();
        clock.anchor(start);
        assert!(clock.remaining_micros(start + 2 * TICK_PERIOD) < 0);

        clock.anchor(start + 2 * TICK_PERIOD);
        assert!(clock.remaining_micros(start + 2 * TICK_PERIOD) > 0);
    }
}
