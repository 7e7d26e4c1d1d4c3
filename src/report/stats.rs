use crate::domain::{SessionLogEntry, Task, TaskStatus};
use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use std::collections::HashSet;

/// Counts shown in the productivity pane and the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductivityStats {
    /// Work sessions that ended on the day of `now`
    pub today_pomodoros: usize,
    /// Completed tasks that had a work session end today
    pub today_tasks_completed: usize,
    /// Work sessions that ended within the last seven calendar days
    pub week_pomodoros: usize,
    /// Completed tasks, all time
    pub total_completed: usize,
}

/// Per-status task counts for the task list header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTotals {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

fn local_date<Tz: TimeZone>(entry: &SessionLogEntry, tz: &Tz) -> NaiveDate {
    entry.end.with_timezone(tz).date_naive()
}

/// Work sessions ending on `date` in the time zone of `tz`
pub fn sessions_on<'a, Tz: TimeZone>(
    sessions: &'a [SessionLogEntry],
    date: NaiveDate,
    tz: &'a Tz,
) -> impl Iterator<Item = &'a SessionLogEntry> + 'a {
    sessions
        .iter()
        .filter(move |s| s.is_work() && local_date(s, tz) == date)
}

/// Calculate productivity counts relative to `now`
pub fn calculate_stats<Tz: TimeZone>(
    sessions: &[SessionLogEntry],
    tasks: &[Task],
    now: DateTime<Tz>,
) -> ProductivityStats {
    let tz = now.timezone();
    let today = now.date_naive();
    let week_start = today - Duration::days(6);

    let today_sessions: Vec<&SessionLogEntry> = sessions_on(sessions, today, &tz).collect();
    let today_task_ids: HashSet<_> = today_sessions.iter().filter_map(|s| s.task_id).collect();

    let week_pomodoros = sessions
        .iter()
        .filter(|s| s.is_work() && local_date(s, &tz) >= week_start)
        .count();

    let completed = tasks.iter().filter(|t| t.status == TaskStatus::Completed);
    let today_tasks_completed = completed
        .clone()
        .filter(|t| today_task_ids.contains(&t.id))
        .count();

    ProductivityStats {
        today_pomodoros: today_sessions.len(),
        today_tasks_completed,
        week_pomodoros,
        total_completed: completed.count(),
    }
}

/// Count tasks by status
pub fn task_totals(tasks: &[Task]) -> TaskTotals {
    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count();

    TaskTotals {
        total: tasks.len(),
        pending: count(TaskStatus::Pending),
        in_progress: count(TaskStatus::InProgress),
        completed: count(TaskStatus::Completed),
    }
}
