use std::time::{Duration, Instant};

use crate::event::PointerEvent;

/// Suggested interval for coalescing pointer-move samples.
pub const DEFAULT_MOVE_THROTTLE: Duration = Duration::from_millis(250);

/// Fixed-interval coalescing of pointer-move samples.
///
/// The first sample of a window runs immediately. Later samples in the same
/// window replace each other; only the latest survives and becomes due once
/// the window has elapsed.
#[derive(Debug, Clone)]
pub struct MoveThrottle {
    interval: Duration,
    last_run: Option<Instant>,
    pending: Option<PointerEvent>,
}

impl MoveThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            pending: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Offer a sample. Returns it back when it should run now, otherwise keeps
    /// it as the pending sample.
    pub fn offer(&mut self, event: PointerEvent, now: Instant) -> Option<PointerEvent> {
        if self.window_elapsed(now) {
            self.last_run = Some(now);
            self.pending = None;
            Some(event)
        } else {
            self.pending = Some(event);
            None
        }
    }

    /// Take the pending sample if its window has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<PointerEvent> {
        if self.pending.is_none() || !self.window_elapsed(now) {
            return None;
        }
        self.last_run = Some(now);
        self.pending.take()
    }

    /// Forget any pending sample and start a fresh window.
    pub fn reset(&mut self) {
        self.last_run = None;
        self.pending = None;
    }

    fn window_elapsed(&self, now: Instant) -> bool {
        match self.last_run {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_runs_immediately() {
        let mut throttle = MoveThrottle::new(DEFAULT_MOVE_THROTTLE);
        let now = Instant::now();
        assert!(throttle.offer(PointerEvent::moved(0, 1), now).is_some());
        assert!(!throttle.has_pending());
    }

    #[test]
    fn latest_sample_in_window_wins() {
        let mut throttle = MoveThrottle::new(Duration::from_millis(100));
        let start = Instant::now();
        throttle.offer(PointerEvent::moved(0, 1), start);

        assert!(throttle
            .offer(PointerEvent::moved(0, 2), start + Duration::from_millis(10))
            .is_none());
        assert!(throttle
            .offer(PointerEvent::moved(0, 3), start + Duration::from_millis(20))
            .is_none());

        assert!(throttle.take_due(start + Duration::from_millis(50)).is_none());
        let due = throttle
            .take_due(start + Duration::from_millis(100))
            .expect("pending sample is due");
        assert_eq!(due, PointerEvent::moved(0, 3));
        assert!(!throttle.has_pending());
    }

    #[test]
    fn reset_drops_pending_sample() {
        let mut throttle = MoveThrottle::new(Duration::from_millis(100));
        let start = Instant::now();
        throttle.offer(PointerEvent::moved(0, 1), start);
        throttle.offer(PointerEvent::moved(0, 2), start);
        throttle.reset();
        assert!(throttle.take_due(start + Duration::from_secs(1)).is_none());
    }
}
