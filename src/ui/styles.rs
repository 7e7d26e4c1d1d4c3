use crate::domain::{TaskStatus, TimerMode};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style(dark: bool) -> Style {
    if dark {
        Style::default().fg(Color::Gray).bg(Color::Black)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Selected row highlight style
pub fn selected_style(dark: bool) -> Style {
    let bg = if dark { Color::Blue } else { Color::LightCyan };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// Running countdown style
pub fn running_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

/// Paused countdown style
pub fn paused_style() -> Style {
    Style::default().fg(Color::Yellow)
}

/// Idle countdown style
pub fn idle_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Badge style for a task's status
pub fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Pending => Style::default().fg(Color::Gray),
        TaskStatus::InProgress => Style::default().fg(Color::Yellow),
        TaskStatus::Completed => Style::default().fg(Color::Green),
    }
}

/// Accent for the interval kind
pub fn mode_style(mode: TimerMode) -> Style {
    let fg = match mode {
        TimerMode::Work => Color::Red,
        TimerMode::ShortBreak => Color::Green,
        TimerMode::LongBreak => Color::Blue,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style(dark: bool) -> Style {
    let fg = if dark { Color::DarkGray } else { Color::Gray };
    Style::default().fg(fg)
}

/// Modal background style
pub fn modal_bg_style(dark: bool) -> Style {
    let bg = if dark { Color::Black } else { Color::DarkGray };
    Style::default().bg(bg).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Countdown gauge style
pub fn gauge_style(mode: TimerMode) -> Style {
    mode_style(mode).bg(Color::DarkGray)
}
