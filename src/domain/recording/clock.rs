//! Presentation clock for an in-progress capture session
//!
//! The clock is derived from instants the caller supplies, so it never reads
//! the system time itself. The authoritative recording length still comes
//! from the capture device when the session stops.

use std::time::Instant;

use super::Duration;

/// Elapsed-time clock that can be frozen and resumed.
///
/// `elapsed = accumulated + (now - segment_start)` while running,
/// `accumulated` while frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedClock {
    accumulated: Duration,
    segment_start: Option<Instant>,
}

impl ElapsedClock {
    /// A stopped clock reading zero
    pub const fn new() -> Self {
        Self {
            accumulated: Duration::ZERO,
            segment_start: None,
        }
    }

    /// A clock that started running at `now`
    pub fn started_at(now: Instant) -> Self {
        Self {
            accumulated: Duration::ZERO,
            segment_start: Some(now),
        }
    }

    /// Whether the clock is currently advancing
    pub fn is_running(&self) -> bool {
        self.segment_start.is_some()
    }

    /// Read the clock
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.segment_start {
            Some(start) => self
                .accumulated
                .saturating_add(Duration::from(now.saturating_duration_since(start))),
            None => self.accumulated,
        }
    }

    /// Freeze at the value observed at `now`. Freezing a frozen clock is a no-op.
    pub fn freeze(&mut self, now: Instant) -> Duration {
        self.accumulated = self.elapsed(now);
        self.segment_start = None;
        self.accumulated
    }

    /// Continue advancing from the frozen value. Resuming a running clock is a no-op.
    pub fn resume(&mut self, now: Instant) {
        if self.segment_start.is_none() {
            self.segment_start = Some(now);
        }
    }
}

impl Default for ElapsedClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    fn ms(n: u64) -> StdDuration {
        StdDuration::from_millis(n)
    }

    #[test]
    fn new_clock_reads_zero() {
        let clock = ElapsedClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn running_clock_advances() {
        let t0 = Instant::now();
        let clock = ElapsedClock::started_at(t0);
        assert_eq!(clock.elapsed(t0 + ms(250)).as_millis(), 250);
        assert_eq!(clock.elapsed(t0 + ms(1250)).as_millis(), 1250);
    }

    #[test]
    fn frozen_clock_stays_put() {
        let t0 = Instant::now();
        let mut clock = ElapsedClock::started_at(t0);
        let frozen = clock.freeze(t0 + ms(400));

        assert_eq!(frozen.as_millis(), 400);
        assert_eq!(clock.elapsed(t0 + ms(5000)).as_millis(), 400);
        assert!(!clock.is_running());
    }

    #[test]
    fn resume_continues_from_frozen_value() {
        let t0 = Instant::now();
        let mut clock = ElapsedClock::started_at(t0);
        clock.freeze(t0 + ms(400));
        clock.resume(t0 + ms(1000));

        assert_eq!(clock.elapsed(t0 + ms(1100)).as_millis(), 500);
    }

    #[test]
    fn double_freeze_and_resume_are_noops() {
        let t0 = Instant::now();
        let mut clock = ElapsedClock::started_at(t0);
        clock.resume(t0 + ms(100));
        assert_eq!(clock.elapsed(t0 + ms(200)).as_millis(), 200);

        clock.freeze(t0 + ms(300));
        clock.freeze(t0 + ms(900));
        assert_eq!(clock.elapsed(t0 + ms(900)).as_millis(), 300);
    }

    #[test]
    fn elapsed_is_monotonic_across_pause_cycles() {
        let t0 = Instant::now();
        let mut clock = ElapsedClock::started_at(t0);
        let mut last = Duration::ZERO;

        for cycle in 0..5u64 {
            let base = cycle * 1000;
            for step in 0..4u64 {
                let now = t0 + ms(base + step * 50);
                let reading = clock.elapsed(now);
                assert!(reading >= last);
                last = reading;
            }
            let frozen = clock.freeze(t0 + ms(base + 200));
            assert!(frozen >= last);
            assert_eq!(clock.elapsed(t0 + ms(base + 900)), frozen);
            last = frozen;
            clock.resume(t0 + ms(base + 1000));
        }
    }
}
