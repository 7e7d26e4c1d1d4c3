use crate::app::AppState;
use crate::domain::TimerMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the end-of-session prompt (break or keep working)
pub fn render_end_prompt(f: &mut Frame, app: &AppState, area: Rect) {
    if !app.ui().show_end_prompt {
        return;
    }
    let modal_area = create_modal_area(area, 11);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let next = app.ui().intended_next_mode.unwrap_or(TimerMode::ShortBreak);
    let next_minutes = app.settings().duration_secs(next) / 60;
    let task = app
        .current_task()
        .map(|t| format!("  {} ({}/{} pomodoros)", t.title, t.completed_sessions, t.estimate))
        .unwrap_or_default();

    let lines = vec![
        Line::raw(""),
        Line::raw("  Focus session complete."),
        Line::raw(task),
        Line::raw(""),
        Line::raw(format!("  Up next: {} ({} min)", next.label(), next_minutes)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [b]", modal_title_style()),
            Span::raw(" Take break  "),
            Span::styled("[c]", modal_title_style()),
            Span::raw(" Keep working  "),
            Span::styled("[r]", modal_title_style()),
            Span::raw(" Reset"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Session Complete ", modal_title_style()))
                .style(modal_bg_style(app.ui().dark_mode)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
