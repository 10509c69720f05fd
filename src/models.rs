use crate::events::{Notification, TrackerEvent};
use crate::progression::{Progression, StreakTier};
use crate::tasks::TaskStore;
use serde::{Deserialize, Serialize};

/// A same-day task. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub deadline_ts: i64,
    #[serde(default)]
    pub reminder_notified: bool,
    #[serde(default)]
    pub completed_at: Option<i64>,
    #[serde(default)]
    pub completed_on_time: bool,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_on_time(&self) -> bool {
        self.completed_at.is_some() && self.completed_on_time
    }
}

/// Everything the tracker persists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppData {
    pub tasks: TaskStore,
    pub progression: Progression,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekPoint {
    pub day: String,
    pub on_time: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub date: String,
    pub level: u32,
    pub streak: u32,
    pub streak_tier: StreakTier,
    pub total_completed_tasks: u64,
    pub badges: Vec<String>,
    pub progress_percent: u32,
    pub week: Vec<WeekPoint>,
    pub tasks: Vec<TaskView>,
}

/// Result of a complete-task action. `completed` is false when the call was
/// a no-op (unknown id or task already done).
#[derive(Debug, Clone, Serialize)]
pub struct CompletionResponse {
    pub completed: bool,
    pub task: Option<Task>,
    pub events: Vec<TrackerEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}
