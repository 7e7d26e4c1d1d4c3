use super::enums::TimerMode;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Longest interval accepted, one day
pub const MAX_MINUTES: u32 = 24 * 60;

/// User-configurable interval lengths and break cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// Every Nth confirmed break is a long one
    pub long_break_every: u32,
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_every: 4,
            sound: true,
        }
    }
}

impl Settings {
    /// Copy with every numeric field raised to at least 1 and durations capped at a day
    pub fn clamped(&self) -> Self {
        Self {
            work_minutes: self.work_minutes.clamp(1, MAX_MINUTES),
            short_break_minutes: self.short_break_minutes.clamp(1, MAX_MINUTES),
            long_break_minutes: self.long_break_minutes.clamp(1, MAX_MINUTES),
            long_break_every: self.long_break_every.max(1),
            sound: self.sound,
        }
    }

    /// Interval length for a mode in whole seconds
    pub fn duration_secs(&self, mode: TimerMode) -> u32 {
        let minutes = match mode {
            TimerMode::Work => self.work_minutes,
            TimerMode::ShortBreak => self.short_break_minutes,
            TimerMode::LongBreak => self.long_break_minutes,
        };
        minutes.clamp(1, MAX_MINUTES) * 60
    }

    pub fn duration_for(&self, mode: TimerMode) -> Duration {
        Duration::seconds(i64::from(self.duration_secs(mode)))
    }
}
