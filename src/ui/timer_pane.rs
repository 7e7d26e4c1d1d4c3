use crate::app::AppState;
use crate::domain::{TimerMode, TimerPhase};
use crate::ui::styles::{
    border_style, gauge_style, idle_style, mode_style, paused_style, running_style, title_style,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Format seconds as MM:SS
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn phase_badge(phase: TimerPhase) -> (&'static str, Style) {
    match phase {
        TimerPhase::Running => ("RUNNING", running_style()),
        TimerPhase::Paused => ("PAUSED", paused_style()),
        TimerPhase::Idle => ("IDLE", idle_style()),
        TimerPhase::AwaitingBreakChoice => ("FINISHED", paused_style()),
    }
}

/// Share of the current interval already elapsed
fn elapsed_ratio(remaining: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (1.0 - f64::from(remaining) / f64::from(total)).clamp(0.0, 1.0)
}

/// Render the countdown pane
pub fn render_timer_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let timer = app.timer();
    let settings = app.settings();
    let phase = app.phase();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.ui().dark_mode))
        .title(Span::styled(" Timer ", title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    // Idle shows the full work duration rather than a stale zero
    let shown = match phase {
        TimerPhase::Idle => settings.duration_secs(TimerMode::Work),
        _ => timer.remaining,
    };
    let (badge, badge_style) = phase_badge(phase);
    let task_line = match app.current_task() {
        _ if timer.mode.is_break() && phase != TimerPhase::Idle => "Step away from the screen".to_string(),
        Some(task) => format!("Task: {}", task.title),
        None => "No task selected".to_string(),
    };

    let lines = vec![
        Line::from(Span::styled(timer.mode.label(), mode_style(timer.mode))),
        Line::raw(""),
        Line::from(Span::styled(format_clock(shown), badge_style)),
        Line::from(Span::styled(badge, badge_style)),
        Line::raw(task_line),
        Line::raw(format!(
            "Cycle {} · long break every {}",
            timer.cycle_count, settings.long_break_every
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[0]);

    let ratio = match phase {
        TimerPhase::Running | TimerPhase::Paused => {
            elapsed_ratio(timer.remaining, settings.duration_secs(timer.mode))
        }
        TimerPhase::AwaitingBreakChoice => 1.0,
        TimerPhase::Idle => 0.0,
    };
    let gauge = Gauge::default()
        .gauge_style(gauge_style(timer.mode))
        .ratio(ratio)
        .label("");
    f.render_widget(gauge, chunks[1]);
}
