//! Time-based debouncing driven by caller-supplied instants.

use std::{
    collections::HashMap,
    hash::Hash,
    time::{Duration, Instant},
};

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

/// Registry entries older than this are dropped on the next call.
pub const RETAIN: Duration = Duration::from_secs(1);

/// Leading-edge dedup keyed by event name: the first event of a key fires,
/// repeats inside the window are swallowed.
#[derive(Debug)]
pub struct Debouncer<K> {
    window: Duration,
    last_fired: HashMap<K, Instant>,
}

impl<K: Eq + Hash> Default for Debouncer<K> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl<K: Eq + Hash> Debouncer<K> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: HashMap::new(),
        }
    }

    pub fn should_fire(&mut self, key: K, now: Instant) -> bool {
        self.prune(now);
        if let Some(previous) = self.last_fired.get(&key) {
            if now.saturating_duration_since(*previous) < self.window {
                return false;
            }
        }
        self.last_fired.insert(key, now);
        true
    }

    pub fn tracked(&self) -> usize {
        self.last_fired.len()
    }

    fn prune(&mut self, now: Instant) {
        let retain = RETAIN.max(self.window);
        self.last_fired
            .retain(|_, fired| now.saturating_duration_since(*fired) < retain);
    }
}

/// Trailing-edge debounce of the latest value, e.g. search input: each push
/// restarts the window and only the last value is released.
#[derive(Debug)]
pub struct Pending<T> {
    window: Duration,
    slot: Option<(T, Instant)>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl<T> Pending<T> {
    pub fn new(window: Duration) -> Self {
        Self { window, slot: None }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.slot = Some((value, now));
    }

    /// Releases the value once the window has passed since the last push.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .slot
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= self.window);
        if due { self.take() } else { None }
    }

    /// Releases the value immediately, e.g. when the user presses Enter.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn cancel(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn repeats_inside_window_are_swallowed() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        assert!(debouncer.should_fire("page-change", start));
        assert!(!debouncer.should_fire("page-change", start + 100 * MS));
        assert!(debouncer.should_fire("view-change", start + 100 * MS));
        assert!(debouncer.should_fire("page-change", start + 300 * MS));
    }

    #[test]
    fn stale_entries_are_pruned() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.should_fire("a", start);
        debouncer.should_fire("b", start);
        debouncer.should_fire("c", start + 1500 * MS);
        assert_eq!(debouncer.tracked(), 1);
    }

    #[test]
    fn pending_releases_latest_value_after_quiet_period() {
        let start = Instant::now();
        let mut pending = Pending::default();
        pending.push("jo", start);
        pending.push("john", start + 200 * MS);
        assert_eq!(pending.poll(start + 400 * MS), None);
        assert_eq!(pending.poll(start + 500 * MS), Some("john"));
        assert!(!pending.is_pending());
    }

    #[test]
    fn take_flushes_immediately() {
        let mut pending = Pending::default();
        pending.push(1, Instant::now());
        assert_eq!(pending.take(), Some(1));
        assert_eq!(pending.take(), None);
    }
}
