use serde::Serialize;
use std::collections::VecDeque;
use tracing::info;

/// Notification-worthy things that happen to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackerEvent {
    TaskCompleted {
        task_id: u64,
        name: String,
        on_time: bool,
    },
    /// Every task on today's list is done on time.
    DayComplete,
    ReminderDue {
        task_id: u64,
        name: String,
        deadline_ts: i64,
    },
    BadgeUnlocked {
        badge: String,
    },
    StreakMilestone {
        streak: u32,
        level: u32,
    },
}

impl TrackerEvent {
    pub fn title(&self) -> &'static str {
        match self {
            Self::TaskCompleted { on_time: true, .. } => "Well done",
            Self::TaskCompleted { on_time: false, .. } => "Good job",
            Self::DayComplete => "Day Complete",
            Self::ReminderDue { .. } => "Reminder",
            Self::BadgeUnlocked { .. } => "Badge Unlocked",
            Self::StreakMilestone { .. } => "Streak Milestone",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::TaskCompleted { name, on_time, .. } => {
                if *on_time {
                    format!("{name} done on time")
                } else {
                    format!("{name} done late")
                }
            }
            Self::DayComplete => "Every task today was finished on time.".to_string(),
            Self::ReminderDue { name, .. } => format!("{name} is due soon"),
            Self::BadgeUnlocked { badge } => badge.clone(),
            Self::StreakMilestone { streak, level } => {
                format!("Streak {streak} days, now level {level}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub at: i64,
    pub title: &'static str,
    pub message: String,
    pub event: TrackerEvent,
}

/// Bounded, in-memory record of recent events, newest last.
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationFeed {
    pub const DEFAULT_CAPACITY: usize = 50;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, at: i64, event: TrackerEvent) {
        info!(kind = event.title(), "{}", event.message());
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Notification {
            at,
            title: event.title(),
            message: event.message(),
            event,
        });
    }

    pub fn recent(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
