use super::enums::TaskStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task that work sessions are counted against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target number of work sessions
    pub estimate: u32,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub completed_sessions: u32,
}

/// Partial set of fields merged into a task by `Task::apply`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub estimate: Option<u32>,
    pub status: Option<TaskStatus>,
    pub completed_sessions: Option<u32>,
}

impl Task {
    pub fn new(title: &str, description: Option<&str>, estimate: u32) -> Self {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description,
            estimate: estimate.max(1),
            status: TaskStatus::Pending,
            completed_sessions: 0,
        }
    }

    /// Merge the supplied fields, leaving the rest untouched
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(estimate) = update.estimate {
            self.estimate = estimate;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(completed) = update.completed_sessions {
            self.completed_sessions = completed;
        }
    }

    /// Promote a pending task once a work interval starts on it
    pub fn mark_in_progress(&mut self) {
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::InProgress;
        }
    }

    /// Count one finished work session; completes the task once the estimate is met
    pub fn record_completed_session(&mut self) {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        if self.completed_sessions >= self.estimate {
            self.status = TaskStatus::Completed;
        }
    }

    /// Fraction of the estimate already done, capped at 1.0
    pub fn progress_ratio(&self) -> f64 {
        let estimate = f64::from(self.estimate.max(1));
        (f64::from(self.completed_sessions) / estimate).min(1.0)
    }
}
