use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// How often the countdown is re-derived from its deadline
pub const DEFAULT_POLL_MS: i64 = 500;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Handle for the single outstanding countdown poll.
///
/// At most one fire is pending at a time. Arming always cancels first, so a
/// stale fire can never outlive the transition that made it obsolete.
#[derive(Debug, Clone)]
pub struct PollScheduler {
    interval: chrono::Duration,
    next_due: Option<DateTime<Utc>>,
    generation: u64,
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(chrono::Duration::milliseconds(DEFAULT_POLL_MS))
    }
}

impl PollScheduler {
    pub fn new(interval: chrono::Duration) -> Self {
        Self {
            interval,
            next_due: None,
            generation: 0,
        }
    }

    /// Schedule a fresh poll chain starting at `now`
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.cancel();
        self.generation += 1;
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Bumped on every `arm`, so callers can tell chains apart
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Retire the pending fire if it is due and queue exactly one successor.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
