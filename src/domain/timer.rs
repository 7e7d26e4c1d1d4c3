use super::enums::TimerMode;
use super::settings::Settings;
use super::ui_state::UiState;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse state of the countdown as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    AwaitingBreakChoice,
}

/// Countdown state. Remaining time is always derived from `end_time`,
/// never accumulated tick by tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerState {
    pub mode: TimerMode,
    pub is_running: bool,
    pub is_paused: bool,
    /// Absolute deadline; only meaningful while running and not paused
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    /// Cached seconds left, frozen while paused
    pub remaining: u32,
    pub current_task_id: Option<Uuid>,
    /// Breaks taken since the last long break
    pub cycle_count: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_start: Option<DateTime<Utc>>,
}

/// Whole seconds from `now` until `end`, rounded, never negative
fn seconds_until(end: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let ms = end.signed_duration_since(now).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    u32::try_from((ms + 500) / 1000).unwrap_or(u32::MAX)
}

impl TimerState {
    pub fn phase(&self, ui: &UiState) -> TimerPhase {
        match (self.is_running, self.is_paused) {
            (true, true) => TimerPhase::Paused,
            (true, false) => TimerPhase::Running,
            (false, _) if ui.is_awaiting_break_choice() => TimerPhase::AwaitingBreakChoice,
            (false, _) => TimerPhase::Idle,
        }
    }

    /// Running and not paused, so the deadline is live
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused && self.end_time.is_some()
    }

    /// Start a fresh interval of `mode`. Cycle count and task are kept.
    pub fn begin(&mut self, mode: TimerMode, now: DateTime<Utc>, settings: &Settings) {
        self.mode = mode;
        self.is_running = true;
        self.is_paused = false;
        self.end_time = Some(now + settings.duration_for(mode));
        self.remaining = settings.duration_secs(mode);
        self.last_start = Some(now);
    }

    /// Freeze the countdown. Returns false when not running or already paused.
    pub fn pause(&mut self) -> bool {
        if !self.is_running || self.is_paused {
            return false;
        }
        self.is_paused = true;
        true
    }

    /// Continue from the frozen remaining time. Returns false unless paused.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_running || !self.is_paused {
            return false;
        }
        self.end_time = Some(now + Duration::seconds(i64::from(self.remaining)));
        self.is_paused = false;
        true
    }

    /// Repair a loaded state that claims to be counting but has no deadline.
    /// It becomes paused on its cached remaining time. Returns true if changed.
    pub fn repair(&mut self) -> bool {
        if self.is_running && !self.is_paused && self.end_time.is_none() {
            self.is_paused = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Stop counting after a work interval; the mode and deadline stay for display
    pub fn stop(&mut self) {
        self.is_running = false;
        self.is_paused = false;
    }

    /// Seconds left at `now` without touching the cached value
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u32 {
        match self.end_time {
            Some(end) if self.is_ticking() => seconds_until(end, now),
            _ => self.remaining,
        }
    }

    /// Refresh `remaining` from the deadline. Returns true once the interval has elapsed.
    /// Does nothing while idle or paused, so repeated calls after expiry are harmless.
    pub fn recompute(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_ticking() {
            return false;
        }
        self.remaining = self.remaining_at(now);
        self.remaining == 0
    }

    /// Break suggested after the current work interval
    pub fn next_break(&self, settings: &Settings) -> TimerMode {
        let every = settings.long_break_every.max(1);
        if self.cycle_count % every + 1 == every {
            TimerMode::LongBreak
        } else {
            TimerMode::ShortBreak
        }
    }
}
