// Poll timing and fetch ordering
//
// PollTimer is the only source of unsolicited state change in the viewer.
// FetchSequence keeps an older response from overwriting a newer one.

use std::time::{Duration, Instant};

/// Cancellable repeating deadline driven by the event loop
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    /// A timer that is not armed yet
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the timer so the next tick is one interval from `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Schedule the following tick after a due tick was handled
    pub fn rearm(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.start(now);
        }
    }

    /// Disarm; a canceled timer never reports due
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn due(&self, now: Instant) -> bool {
        matches!(self.next_due, Some(deadline) if now >= deadline)
    }
}

/// Monotonic request numbering for packet fetches
#[derive(Debug, Clone, Default)]
pub struct FetchSequence {
    issued: u64,
    applied: u64,
}

impl FetchSequence {
    /// Number for a new request
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a response for `seq` may be applied; records it if so
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }

    pub fn last_applied(&self) -> u64 {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_inactive_until_started() {
        let timer = PollTimer::new(Duration::from_secs(5));
        let now = Instant::now();
        assert!(!timer.is_active());
        assert!(!timer.due(now + Duration::from_secs(60)));
    }

    #[test]
    fn test_timer_fires_after_interval() {
        let mut timer = PollTimer::new(Duration::from_secs(5));
        let start = Instant::now();
        timer.start(start);
        assert!(!timer.due(start + Duration::from_secs(4)));
        assert!(timer.due(start + Duration::from_secs(5)));

        let tick = start + Duration::from_secs(6);
        timer.rearm(tick);
        assert!(!timer.due(tick + Duration::from_secs(4)));
        assert!(timer.due(tick + Duration::from_secs(5)));
    }

    #[test]
    fn test_canceled_timer_never_fires() {
        let mut timer = PollTimer::new(Duration::from_secs(5));
        let start = Instant::now();
        timer.start(start);
        timer.cancel();
        assert!(!timer.due(start + Duration::from_secs(3600)));

        // rearm does not resurrect a canceled timer
        timer.rearm(start);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_sequence_drops_stale_responses() {
        let mut seq = FetchSequence::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.accept(second));
        assert!(!seq.accept(first));
        assert!(!seq.accept(second));
        assert_eq!(seq.last_applied(), second);
        let third = seq.issue();
        assert!(seq.accept(third));
    }
}
