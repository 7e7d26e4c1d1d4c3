use crate::domain::{SessionLogEntry, Task};
use crate::persistence::{Store, StoreKey};
use crate::report::stats::{calculate_stats, sessions_on, task_totals, ProductivityStats};
use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate, TimeZone};
use std::fs;
use std::path::PathBuf;

/// Format duration as "Xh Ym" or "Xm" for display
fn format_duration(duration: Duration) -> String {
    let total_mins = duration.num_minutes();
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Title for a log entry's task, tolerating deleted tasks
pub(crate) fn task_title(tasks: &[Task], entry: &SessionLogEntry) -> String {
    match entry.task_id {
        Some(id) => tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| "(deleted task)".to_string()),
        None => "(no task)".to_string(),
    }
}

/// Render the markdown report for one calendar day in `tz`
pub fn render_report<Tz: TimeZone>(
    date: NaiveDate,
    sessions: &[SessionLogEntry],
    tasks: &[Task],
    tz: &Tz,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stats = date
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| tz.from_local_datetime(&noon).earliest())
        .map(|anchor| calculate_stats(sessions, tasks, anchor))
        .unwrap_or_else(ProductivityStats::default);

    let mut day_sessions: Vec<&SessionLogEntry> = sessions_on(sessions, date, tz).collect();
    day_sessions.sort_by_key(|s| s.start);
    let focus_time = day_sessions
        .iter()
        .fold(Duration::zero(), |acc, s| acc + s.duration());

    let mut report = String::new();

    report.push_str(&format!("# Pomodoro Report - {}\n\n", date));

    report.push_str("## Summary\n\n");
    report.push_str(&format!("- **Pomodoros:** {}\n", stats.today_pomodoros));
    report.push_str(&format!("- **Focus Time:** {}\n", format_duration(focus_time)));
    report.push_str(&format!("- **Tasks Completed:** {}\n", stats.today_tasks_completed));
    report.push_str(&format!("- **Pomodoros (7 days):** {}\n", stats.week_pomodoros));
    report.push_str(&format!("- **Tasks Completed (all time):** {}\n\n", stats.total_completed));

    report.push_str("## Sessions\n\n");
    if day_sessions.is_empty() {
        report.push_str("No sessions recorded.\n\n");
    } else {
        for entry in &day_sessions {
            report.push_str(&format!(
                "- {}–{} {} ({})\n",
                entry.start.with_timezone(tz).format("%H:%M"),
                entry.end.with_timezone(tz).format("%H:%M"),
                task_title(tasks, entry),
                format_duration(entry.duration()),
            ));
        }
        report.push('\n');
    }

    let totals = task_totals(tasks);
    report.push_str("## Tasks\n\n");
    report.push_str(&format!(
        "Total {} · Pending {} · In Progress {} · Completed {}\n\n",
        totals.total, totals.pending, totals.in_progress, totals.completed
    ));
    for task in tasks {
        report.push_str(&format!(
            "- [{}] {} ({}/{} pomodoros)\n",
            task.status.to_tag(),
            task.title,
            task.completed_sessions,
            task.estimate
        ));
    }

    report
}

/// Generate a report for the specified date and write it to disk
pub fn generate_report(store: &Store, date: Option<NaiveDate>, output_path: Option<PathBuf>) -> Result<PathBuf> {
    let report_date = date.unwrap_or_else(|| Local::now().date_naive());

    let sessions: Vec<SessionLogEntry> = store.load(StoreKey::Sessions, Vec::new());
    let tasks: Vec<Task> = store.load(StoreKey::Tasks, Vec::new());

    let report = render_report(report_date, &sessions, &tasks, &Local);

    let path = output_path.unwrap_or_else(|| {
        store
            .root()
            .join(format!("report-{}.md", report_date.format("%Y-%m-%d")))
    });
    fs::write(&path, report)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    Ok(path)
}
