use super::enums::TimerMode;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed interval in the session history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLogEntry {
    pub id: Uuid,
    /// Task the interval was spent on; may refer to a task deleted since
    #[serde(default)]
    pub task_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: TimerMode,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end: DateTime<Utc>,
}

impl SessionLogEntry {
    pub fn new(task_id: Option<Uuid>, kind: TimerMode, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            kind,
            start,
            end,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    pub fn is_work(&self) -> bool {
        self.kind == TimerMode::Work
    }
}
