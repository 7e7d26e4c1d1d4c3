use crate::domain::{SessionLogEntry, Task, TimerPhase, TimerState, UiState};
use crate::persistence::{Store, StoreKey};
use crate::report::stats::calculate_stats;
use chrono::{DateTime, Local, Utc};

/// One-screen summary of the stored timer and today's counts.
/// Remaining time is derived from the stored deadline; nothing is written back.
pub fn render_status(
    timer: &TimerState,
    ui: &UiState,
    tasks: &[Task],
    sessions: &[SessionLogEntry],
    now: DateTime<Utc>,
) -> String {
    let remaining = timer.remaining_at(now);
    let phase = match timer.phase(ui) {
        TimerPhase::Running if remaining == 0 => "finished (open the app to continue)",
        TimerPhase::Running => "running",
        TimerPhase::Paused => "paused",
        TimerPhase::Idle => "idle",
        TimerPhase::AwaitingBreakChoice => "waiting for break choice",
    };
    let task = timer
        .current_task_id
        .and_then(|id| tasks.iter().find(|t| t.id == id))
        .map(|t| t.title.as_str())
        .unwrap_or("-");
    let stats = calculate_stats(sessions, tasks, now.with_timezone(&Local));

    let mut out = String::new();
    out.push_str(&format!("Mode:      {}\n", timer.mode.label()));
    out.push_str(&format!("State:     {}\n", phase));
    out.push_str(&format!("Remaining: {:02}:{:02}\n", remaining / 60, remaining % 60));
    out.push_str(&format!("Task:      {}\n", task));
    out.push_str(&format!("Cycle:     {}\n", timer.cycle_count));
    out.push_str(&format!(
        "Today:     {} pomodoros, {} tasks completed\n",
        stats.today_pomodoros, stats.today_tasks_completed
    ));
    out.push_str(&format!("Week:      {} pomodoros\n", stats.week_pomodoros));
    out
}

/// Load the stored state and render it
pub fn status_from_store(store: &Store) -> String {
    let timer: TimerState = store.load(StoreKey::Timer, TimerState::default());
    let ui: UiState = store.load(StoreKey::Ui, UiState::default());
    let tasks: Vec<Task> = store.load(StoreKey::Tasks, Vec::new());
    let sessions: Vec<SessionLogEntry> = store.load(StoreKey::Sessions, Vec::new());
    render_status(&timer, &ui, &tasks, &sessions, Utc::now())
}
