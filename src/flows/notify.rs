//! Transient toast notifications.

use serde::Serialize;

use crate::wizard::timers::Millis;

/// Delay before a new toast slides in.
pub const SHOW_DELAY_MS: Millis = 100;
/// Time a dismissed toast takes to slide out before removal.
pub const LEAVE_MS: Millis = 300;

/// Toast category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    /// Glyph shown before the message.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Success => "✔",
            Self::Error => "✖",
        }
    }
}

/// Lifecycle phase of a toast at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Shown,
    Leaving,
}

/// A single toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub level: Level,
    pub message: String,
    pub created_at: Millis,
}

/// Queue of live toasts with fixed-duration auto-dismiss.
#[derive(Debug, Clone)]
pub struct Notifier {
    toasts: Vec<Notification>,
    next_id: u64,
    display_ms: Millis,
}

impl Notifier {
    /// `display_ms` is the time from creation until the toast starts leaving.
    pub fn new(display_ms: Millis) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            display_ms,
        }
    }

    /// Adds a toast created at `now` and returns its id.
    pub fn push(&mut self, level: Level, message: impl Into<String>, now: Millis) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Notification {
            id,
            level,
            message: message.into(),
            created_at: now,
        });
        id
    }

    /// Phase of `toast` at `now`, or `None` once it has been removed.
    pub fn phase(&self, toast: &Notification, now: Millis) -> Option<Phase> {
        let age = now.saturating_sub(toast.created_at);
        if age < SHOW_DELAY_MS {
            Some(Phase::Entering)
        } else if age < self.display_ms {
            Some(Phase::Shown)
        } else if age < self.display_ms.saturating_add(LEAVE_MS) {
            Some(Phase::Leaving)
        } else {
            None
        }
    }

    /// Drops every toast whose lifetime has ended by `now`.
    pub fn prune(&mut self, now: Millis) {
        let display_ms = self.display_ms;
        self.toasts
            .retain(|t| now.saturating_sub(t.created_at) < display_ms.saturating_add(LEAVE_MS));
    }

    /// Live toasts, oldest first.
    pub fn toasts(&self) -> &[Notification] {
        &self.toasts
    }

    /// Most recent live toast.
    pub fn latest(&self) -> Option<&Notification> {
        self.toasts.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_follows_fixed_durations() {
        let mut notifier = Notifier::new(3000);
        notifier.push(Level::Success, "saved", 1000);
        let toast = notifier.latest().cloned().unwrap();

        assert_eq!(notifier.phase(&toast, 1050), Some(Phase::Entering));
        assert_eq!(notifier.phase(&toast, 1100), Some(Phase::Shown));
        assert_eq!(notifier.phase(&toast, 3999), Some(Phase::Shown));
        assert_eq!(notifier.phase(&toast, 4000), Some(Phase::Leaving));
        assert_eq!(notifier.phase(&toast, 4300), None);
    }

    #[test]
    fn unbounded_display_time_never_expires() {
        let mut notifier = Notifier::new(Millis::MAX);
        notifier.push(Level::Info, "sticky", 0);
        let toast = notifier.latest().cloned().unwrap();
        assert_eq!(notifier.phase(&toast, Millis::MAX - 1), Some(Phase::Shown));
        notifier.prune(Millis::MAX - 1);
        assert_eq!(notifier.toasts().len(), 1);
    }

    #[test]
    fn prune_removes_expired_only() {
        let mut notifier = Notifier::new(3000);
        notifier.push(Level::Info, "old", 0);
        notifier.push(Level::Error, "new", 2000);
        notifier.prune(3300);
        assert_eq!(notifier.toasts().len(), 1);
        assert_eq!(notifier.toasts()[0].message, "new");
    }

    #[test]
    fn ids_increase() {
        let mut notifier = Notifier::new(3000);
        let a = notifier.push(Level::Info, "a", 0);
        let b = notifier.push(Level::Info, "b", 0);
        assert!(b > a);
    }
}
