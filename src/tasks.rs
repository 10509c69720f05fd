use crate::clock::Clock;
use crate::errors::TrackerError;
use crate::models::Task;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

const MISSING_INPUT: &str = "Enter task name and a deadline time.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Appends a pending task due at `deadline` (time-of-day) today.
    pub fn add(&mut self, name: &str, deadline: &str, clock: &dyn Clock) -> Result<&Task, TrackerError> {
        let name = name.trim();
        let deadline = deadline.trim();
        if name.is_empty() || deadline.is_empty() {
            return Err(TrackerError::validation(MISSING_INPUT));
        }

        let time = parse_time_of_day(deadline)?;
        let deadline_ts = clock
            .at_time_today(time)
            .ok_or_else(|| TrackerError::validation(format!("{deadline} does not exist today")))?
            .timestamp_millis();

        let id = self.next_id(clock.now_millis());
        self.tasks.push(Task {
            id,
            name: name.to_string(),
            deadline_ts,
            reminder_notified: false,
            completed_at: None,
            completed_on_time: false,
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Marks the task done at `now`. Returns the task only if this call
    /// completed it; unknown ids and finished tasks are left untouched.
    pub fn complete(&mut self, id: u64, now: i64) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        if task.is_completed() {
            return None;
        }

        task.completed_at = Some(now);
        task.completed_on_time = now <= task.deadline_ts;
        task.reminder_notified = true;
        Some(task)
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn on_time_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_on_time()).count()
    }

    pub fn all_on_time(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(Task::is_on_time)
    }

    /// Share of today's tasks done on time, rounded to a whole percent.
    pub fn progress_percent(&self) -> u32 {
        if self.tasks.is_empty() {
            return 0;
        }
        let pct = self.on_time_count() as f64 / self.tasks.len() as f64 * 100.0;
        pct.round() as u32
    }

    fn next_id(&self, now: i64) -> u64 {
        let candidate = u64::try_from(now).unwrap_or_default();
        match self.tasks.iter().map(|task| task.id).max() {
            Some(max) if max >= candidate => max + 1,
            _ => candidate,
        }
    }
}

/// Accepts `HH:MM`, `HH:MM:SS` or a bare hour.
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, TrackerError> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .or_else(|_| {
            input
                .parse::<u32>()
                .ok()
                .and_then(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
                .ok_or(())
        })
        .map_err(|_| TrackerError::validation(format!("invalid deadline time: {input}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending { minutes_left: i64 },
    DoneOnTime,
    DoneLate,
    Missed,
}

impl TaskStatus {
    pub fn of(task: &Task, now: i64) -> Self {
        if task.is_completed() {
            if task.completed_on_time {
                Self::DoneOnTime
            } else {
                Self::DoneLate
            }
        } else if task.deadline_ts > now {
            let remaining = task.deadline_ts - now;
            Self::Pending {
                minutes_left: (remaining + 59_999) / 60_000,
            }
        } else {
            Self::Missed
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending { minutes_left } => write!(f, "{minutes_left} min left"),
            Self::DoneOnTime => f.write_str("Done on-time"),
            Self::DoneLate => f.write_str("Done (late)"),
            Self::Missed => f.write_str("Missed"),
        }
    }
}
