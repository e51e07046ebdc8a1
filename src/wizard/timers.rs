//! Ordered queue of deferred tasks on a virtual millisecond clock.
//!
//! Each task is keyed; scheduling a key that is already pending replaces
//! the older task, so at most one task per key is ever outstanding. Tasks
//! fire in due-time order, ties in scheduling order.

use std::collections::BTreeMap;

/// Milliseconds on the application clock.
pub type Millis = u64;

/// Keyed deferred task queue.
#[derive(Debug)]
pub struct Timers<K, T> {
    queue: BTreeMap<(Millis, u64), (K, T)>,
    next_seq: u64,
}

impl<K, T> Default for Timers<K, T> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Copy + Eq, T> Timers<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` under `key` to fire at `due`.
    ///
    /// Returns `true` when a pending task with the same key was replaced.
    pub fn schedule(&mut self, key: K, due: Millis, task: T) -> bool {
        let superseded = self.cancel(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), (key, task));
        superseded
    }

    /// Drops the pending task under `key`. Returns `true` if one existed.
    pub fn cancel(&mut self, key: K) -> bool {
        let slot = self
            .queue
            .iter()
            .find(|(_, (k, _))| *k == key)
            .map(|(slot, _)| *slot);
        slot.is_some_and(|slot| self.queue.remove(&slot).is_some())
    }

    /// Returns `true` when a task under `key` is waiting to fire.
    pub fn is_pending(&self, key: K) -> bool {
        self.queue.values().any(|(k, _)| *k == key)
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, K, T)> {
        let (&(due, _), _) = self.queue.first_key_value()?;
        if due > now {
            return None;
        }
        self.queue
            .pop_first()
            .map(|((due, _), (key, task))| (due, key, task))
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        A,
        B,
    }

    #[test]
    fn fires_in_due_order() {
        let mut timers = Timers::new();
        timers.schedule(Key::A, 300, "late");
        timers.schedule(Key::B, 100, "early");

        assert!(timers.pop_due(50).is_none());
        assert_eq!(timers.pop_due(1000), Some((100, Key::B, "early")));
        assert_eq!(timers.pop_due(1000), Some((300, Key::A, "late")));
        assert!(timers.is_empty());
    }

    #[test]
    fn same_key_supersedes() {
        let mut timers = Timers::new();
        assert!(!timers.schedule(Key::A, 300, 1));
        assert!(timers.schedule(Key::A, 500, 2));
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.pop_due(1000), Some((500, Key::A, 2)));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut timers = Timers::new();
        timers.schedule(Key::B, 100, "first");
        timers.schedule(Key::A, 100, "second");
        assert_eq!(timers.pop_due(100).map(|t| t.2), Some("first"));
        assert_eq!(timers.pop_due(100).map(|t| t.2), Some("second"));
    }

    #[test]
    fn cancel_removes_pending_task() {
        let mut timers = Timers::new();
        timers.schedule(Key::A, 100, ());
        assert!(timers.is_pending(Key::A));
        assert!(timers.cancel(Key::A));
        assert!(!timers.cancel(Key::A));
        assert!(!timers.is_pending(Key::A));
        assert_eq!(timers.next_due(), None);
    }
}
