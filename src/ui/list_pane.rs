use crate::app::AppState;
use crate::domain::Task;
use crate::report::task_totals;
use crate::ui::styles::{border_style, default_style, running_style, selected_style, status_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const MAX_DOTS: u32 = 10;

/// Tomato row such as "●●○○" for completed vs estimated pomodoros.
/// Long estimates are cut at `MAX_DOTS` with a trailing "…".
fn pomodoro_dots(task: &Task) -> String {
    let shown = task.estimate.min(MAX_DOTS);
    let done = task.completed_sessions.min(shown) as usize;
    let mut dots = "●".repeat(done);
    dots.push_str(&"○".repeat(shown as usize - done));
    if task.estimate > MAX_DOTS {
        dots.push('…');
    }
    if task.completed_sessions > task.estimate {
        dots.push_str(&format!("+{}", task.completed_sessions - task.estimate));
    }
    dots
}

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let dark = app.ui().dark_mode;
    let totals = task_totals(app.tasks());
    let title = format!(
        " Tasks ({} pending · {} active · {} done) ",
        totals.pending, totals.in_progress, totals.completed
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(dark))
        .title(Span::styled(title, title_style()));

    if app.tasks().is_empty() {
        let empty = Paragraph::new("No tasks yet. Press 'a' to add one.")
            .style(default_style(dark))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let current = app.timer().current_task_id;
    let items: Vec<ListItem> = app
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let line = create_task_line(task, current == Some(task.id));
            let style = if idx == app.selected_index {
                selected_style(dark)
            } else {
                default_style(dark)
            };
            ListItem::new(line).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

/// Format: ▶ Write proposal  ●●○ 2/3  In Progress  · notes
fn create_task_line(task: &Task, is_current: bool) -> Line<'static> {
    let mut spans = Vec::new();

    if is_current {
        spans.push(Span::styled("▶ ".to_string(), running_style()));
    } else {
        spans.push(Span::raw("  ".to_string()));
    }

    spans.push(Span::raw(task.title.clone()));
    spans.push(Span::raw(format!(
        "  {} {}/{} ({:.0}%)  ",
        pomodoro_dots(task),
        task.completed_sessions,
        task.estimate,
        task.progress_ratio() * 100.0
    )));
    spans.push(Span::styled(task.status.to_tag().to_string(), status_style(task.status)));

    if let Some(description) = &task.description {
        spans.push(Span::raw(format!("  · {}", description)));
    }

    Line::from(spans)
}
