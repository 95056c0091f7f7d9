//! Debounce timer for draft auto-saves.

use std::time::{Duration, Instant};

/// Coalesces bursts of mutations into a single deferred save.
///
/// There is at most one pending deadline: arming again while armed resets
/// the timer rather than stacking a second one. The engine's host drives
/// this from its event loop by polling [`SaveDebouncer::take_due`].
#[derive(Debug)]
pub struct SaveDebouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl SaveDebouncer {
    /// Create a debouncer with the given quiescence window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// The configured quiescence window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Note a mutation at `now`, (re)starting the quiescence window.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Check whether a save is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the deadline if it has passed.
    ///
    /// Returns `true` exactly once per armed window; subsequent calls
    /// return `false` until the next [`SaveDebouncer::arm`].
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending deadline without firing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_before_window() {
        let mut debounce = SaveDebouncer::new(Duration::from_secs(1));
        let start = Instant::now();
        debounce.arm(start);
        assert!(debounce.is_armed());
        assert!(!debounce.take_due(start));
        assert!(!debounce.take_due(start + Duration::from_millis(999)));
        assert!(debounce.is_armed());
    }

    #[test]
    fn test_fires_once_after_window() {
        let mut debounce = SaveDebouncer::new(Duration::from_secs(1));
        let start = Instant::now();
        debounce.arm(start);
        assert!(debounce.take_due(start + Duration::from_secs(2)));
        // Consumed: no second firing without re-arming.
        assert!(!debounce.take_due(start + Duration::from_secs(3)));
        assert!(!debounce.is_armed());
    }

    #[test]
    fn test_rearming_resets_the_deadline() {
        let mut debounce = SaveDebouncer::new(Duration::from_secs(1));
        let start = Instant::now();
        debounce.arm(start);
        debounce.arm(start + Duration::from_millis(900));
        // The first deadline has been superseded.
        assert!(!debounce.take_due(start + Duration::from_millis(1100)));
        assert!(debounce.take_due(start + Duration::from_millis(1900)));
    }

    #[test]
    fn test_cancel() {
        let mut debounce = SaveDebouncer::new(Duration::from_secs(1));
        debounce.arm(Instant::now());
        debounce.cancel();
        assert!(!debounce.is_armed());
        assert!(!debounce.take_due(Instant::now() + Duration::from_secs(5)));
    }

    #[test]
    fn test_unarmed_is_never_due() {
        let mut debounce = SaveDebouncer::new(Duration::from_secs(1));
        assert!(!debounce.take_due(Instant::now() + Duration::from_secs(60)));
    }
}
