use super::enums::TimerMode;
use serde::{Deserialize, Serialize};

/// Persisted view flags, including the pending end-of-session choice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub dark_mode: bool,
    pub show_settings: bool,
    /// Set when a work interval has elapsed and the user has not yet picked break or continue
    pub show_end_prompt: bool,
    pub intended_next_mode: Option<TimerMode>,
}

impl UiState {
    pub fn is_awaiting_break_choice(&self) -> bool {
        self.show_end_prompt
    }

    pub fn await_break_choice(&mut self, next: TimerMode) {
        self.show_end_prompt = true;
        self.intended_next_mode = Some(next);
    }

    /// Dismiss the end-of-session prompt, returning the break it suggested
    pub fn take_break_choice(&mut self) -> Option<TimerMode> {
        self.show_end_prompt = false;
        self.intended_next_mode.take()
    }
}
