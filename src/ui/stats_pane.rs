use crate::app::AppState;
use crate::domain::SessionLogEntry;
use crate::report::generator::task_title;
use crate::report::{calculate_stats, ProductivityStats};
use crate::ui::styles::{border_style, default_style, title_style};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const RECENT_SESSIONS: usize = 5;

fn stat_line(label: &'static str, value: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, title_style()),
        Span::raw(value.to_string()),
    ])
}

fn build_lines(stats: &ProductivityStats, recent: &[SessionLogEntry], app: &AppState) -> Vec<Line<'static>> {
    let mut lines = vec![
        stat_line("Today:        ", stats.today_pomodoros),
        stat_line("Done today:   ", stats.today_tasks_completed),
        stat_line("Last 7 days:  ", stats.week_pomodoros),
        stat_line("Completed:    ", stats.total_completed),
        Line::raw(""),
        Line::from(Span::styled("Recent", title_style())),
    ];

    if recent.is_empty() {
        lines.push(Line::raw("  No sessions yet"));
    }
    for entry in recent.iter().take(RECENT_SESSIONS) {
        let title = task_title(app.tasks(), entry);
        lines.push(Line::raw(format!(
            "  {} {} ({}m)",
            entry.end.with_timezone(&Local).format("%m-%d %H:%M"),
            title,
            entry.duration().num_minutes()
        )));
    }

    lines
}

/// Render the productivity pane
pub fn render_stats_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let dark = app.ui().dark_mode;
    let stats = calculate_stats(app.sessions(), app.tasks(), Local::now());

    let paragraph = Paragraph::new(build_lines(&stats, app.sessions(), app))
        .style(default_style(dark))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(dark))
                .title(Span::styled(" Productivity ", title_style())),
        );

    f.render_widget(paragraph, area);
}
