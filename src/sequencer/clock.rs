// Tick clock - Fixed-interval driver for the sequencer
// Tracks the next due instant; the owner polls it with the current time

use std::time::{Duration, Instant};

/// Wall-clock length of one tick
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic tick source
///
/// Deadlines advance by whole intervals from the arming instant, so late
/// polls do not accumulate drift.
#[derive(Debug, Clone)]
pub struct TickClock {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickClock {
    /// Create a disarmed clock
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm the clock; the first tick is due one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Cancel any pending tick
    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Consume one due tick, if any
    pub fn take_due(&mut self, now: Instant) -> bool {
        if let Some(due) = self.next_due
            && now >= due
        {
            self.next_due = Some(due + self.interval);
            return true;
        }
        false
    }

    /// Time left until the next tick (zero if overdue, `None` if disarmed)
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_clock_never_ticks() {
        let mut clock = TickClock::default();
        let now = Instant::now();

        assert!(!clock.take_due(now + Duration::from_secs(10)));
        assert_eq!(clock.time_until_next(now), None);
    }

    #[test]
    fn test_tick_due_after_interval() {
        let mut clock = TickClock::new(Duration::from_millis(100));
        let start = Instant::now();
        clock.arm(start);

        assert_eq!(clock.time_until_next(start), Some(Duration::from_millis(100)));
        assert!(!clock.take_due(start + Duration::from_millis(99)));
        assert!(clock.take_due(start + Duration::from_millis(100)));
        assert!(!clock.take_due(start + Duration::from_millis(150)));
        assert_eq!(
            clock.time_until_next(start + Duration::from_millis(150)),
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn test_late_poll_catches_up_without_drift() {
        let mut clock = TickClock::new(Duration::from_millis(100));
        let start = Instant::now();
        clock.arm(start);

        let late = start + Duration::from_millis(350);
        let mut delivered = 0;
        while clock.take_due(late) {
            delivered += 1;
        }
        assert_eq!(delivered, 3);
        assert_eq!(clock.time_until_next(late), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_disarm_cancels_pending_tick() {
        let mut clock = TickClock::new(Duration::from_millis(100));
        let start = Instant::now();
        clock.arm(start);
        clock.disarm();

        assert_eq!(clock.time_until_next(start), None);
        assert!(!clock.take_due(start + Duration::from_secs(1)));
    }
}
