//! Debouncing of search input.
//!
//! Every keystroke changes the query, but only the query that stays put for
//! `delay` should hit the backend. The debouncer is a plain state machine
//! with the clock passed in, so callers drive it from whatever timer they
//! have (a Tokio sleep in the CLI, a fixed instant in tests).

use std::time::{Duration, Instant};

/// Delay used by the storefront between the last keystroke and the fetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces a burst of values into the last one.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new value at `now`, replacing any pending one and
    /// restarting the timer.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// Take the pending value if its deadline has passed.
    ///
    /// Each pushed value is returned at most once.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drop the pending value without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ProductQuery;

    #[test]
    fn test_only_last_value_of_burst_fires() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();

        debouncer.push(ProductQuery::new().with_search("c"), start);
        debouncer.push(
            ProductQuery::new().with_search("ca"),
            start + Duration::from_millis(100),
        );
        debouncer.push(
            ProductQuery::new().with_search("cal"),
            start + Duration::from_millis(200),
        );

        assert_eq!(debouncer.poll(start + Duration::from_millis(450)), None);
        let fired = debouncer.poll(start + Duration::from_millis(500));
        assert_eq!(fired.map(|q| q.search), Some("cal".to_string()));
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_deadline_moves_with_each_push() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));
        assert_eq!(debouncer.deadline(), None);

        debouncer.push(1, start);
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(50)));

        debouncer.push(2, start + Duration::from_millis(30));
        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(80)));
    }

    #[test]
    fn test_cancel_and_flush() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(50));

        debouncer.push("a", start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);

        debouncer.push("b", start);
        assert_eq!(debouncer.flush(), Some("b"));
        assert!(!debouncer.is_pending());
    }
}
