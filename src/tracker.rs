use crate::clock::Clock;
use crate::config::TrackerPolicy;
use crate::errors::TrackerError;
use crate::evaluator::{evaluate_day, EvaluationOutcome};
use crate::events::{Notification, NotificationFeed, TrackerEvent};
use crate::models::{AppData, CompletionResponse, StateResponse, Task, TaskView};
use crate::reminder;
use crate::storage::Storage;
use crate::tasks::TaskStatus;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct Tracker {
    data: AppData,
    storage: Storage,
    clock: Arc<dyn Clock>,
    policy: TrackerPolicy,
    notifications: NotificationFeed,
    last_closed_day: Option<NaiveDate>,
}

impl Tracker {
    pub fn new(data: AppData, storage: Storage, clock: Arc<dyn Clock>, policy: TrackerPolicy) -> Self {
        Self {
            data,
            storage,
            clock,
            policy,
            notifications: NotificationFeed::default(),
            last_closed_day: None,
        }
    }

    /// Loads persisted state from `storage`.
    pub async fn open(storage: Storage, clock: Arc<dyn Clock>, policy: TrackerPolicy) -> Self {
        let data = storage.load().await;
        info!(
            tasks = data.tasks.len(),
            level = data.progression.level,
            streak = data.progression.streak,
            "loaded tracker state from {}",
            storage.dir().display()
        );
        Self::new(data, storage, clock, policy)
    }

    pub fn data(&self) -> &AppData {
        &self.data
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn policy(&self) -> &TrackerPolicy {
        &self.policy
    }

    pub async fn add_task(&mut self, name: &str, deadline: &str) -> Result<Task, TrackerError> {
        let mut next = self.data.clone();
        let task = next.tasks.add(name, deadline, self.clock.as_ref())?.clone();
        self.commit(next).await?;
        info!(id = task.id, "added task {}", task.name);
        Ok(task)
    }

    pub async fn complete_task(&mut self, id: u64) -> Result<CompletionResponse, TrackerError> {
        let now = self.clock.now_millis();
        let mut next = self.data.clone();
        let Some(task) = next.tasks.complete(id, now).cloned() else {
            debug!(id, "complete ignored: unknown or already done");
            return Ok(CompletionResponse {
                completed: false,
                task: self.data.tasks.get(id).cloned(),
                events: Vec::new(),
            });
        };

        let mut events = vec![TrackerEvent::TaskCompleted {
            task_id: task.id,
            name: task.name.clone(),
            on_time: task.completed_on_time,
        }];
        if next.tasks.all_on_time() {
            events.push(TrackerEvent::DayComplete);
        }
        events.extend(next.progression.record_completion());

        self.commit(next).await?;
        self.emit(&events);
        Ok(CompletionResponse {
            completed: true,
            task: Some(task),
            events,
        })
    }

    /// One pass of the reminder scanner. Persists only when something changed.
    pub async fn scan_reminders(&mut self) -> Result<Vec<TrackerEvent>, TrackerError> {
        let now = self.clock.now_millis();
        let mut next = self.data.clone();
        let events = reminder::scan(&mut next.tasks, now, self.policy.reminder_window);
        if !events.is_empty() {
            self.commit(next).await?;
            self.emit(&events);
        }
        Ok(events)
    }

    /// Closes out the calendar day before the current one. Returns `None`
    /// when that day has already been closed by this process.
    pub async fn run_daily_evaluation(&mut self) -> Result<Option<EvaluationOutcome>, TrackerError> {
        let closed_day = self.clock.today() - Duration::days(1);
        if self.last_closed_day.is_some_and(|last| closed_day <= last) {
            warn!(day = %closed_day, "daily evaluation skipped: day already closed");
            return Ok(None);
        }

        let mut next = self.data.clone();
        let outcome = evaluate_day(&mut next, closed_day, &self.policy);
        self.commit(next).await?;
        self.last_closed_day = Some(closed_day);
        info!(
            day = %outcome.day,
            on_time = outcome.on_time_count,
            missed = outcome.missed_count,
            streak = outcome.streak,
            level = outcome.level,
            "daily evaluation complete"
        );
        self.emit(&outcome.events);
        Ok(Some(outcome))
    }

    /// Wipes every persisted entry and returns to defaults.
    pub async fn reset(&mut self) -> Result<(), TrackerError> {
        self.storage.clear().await?;
        self.data = AppData::default();
        self.notifications.clear();
        info!("tracker reset to defaults");
        Ok(())
    }

    pub fn snapshot(&self) -> StateResponse {
        let now = self.clock.now_millis();
        let progression = &self.data.progression;
        StateResponse {
            date: self.clock.today().to_string(),
            level: progression.level,
            streak: progression.streak,
            streak_tier: progression.streak_tier(),
            total_completed_tasks: progression.total_completed_tasks,
            badges: progression.badges.clone(),
            progress_percent: self.data.tasks.progress_percent(),
            week: progression.week_chart(self.policy.week_start),
            tasks: self
                .data
                .tasks
                .iter()
                .map(|task| TaskView {
                    task: task.clone(),
                    status: TaskStatus::of(task, now).to_string(),
                })
                .collect(),
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.recent()
    }

    /// Persists `next` and only then makes it the live state.
    async fn commit(&mut self, next: AppData) -> Result<(), TrackerError> {
        if let Err(err) = self.storage.persist(&next).await {
            error!("failed to persist tracker state: {err}");
            return Err(err);
        }
        self.data = next;
        Ok(())
    }

    fn emit(&mut self, events: &[TrackerEvent]) {
        let now = self.clock.now_millis();
        for event in events {
            self.notifications.push(now, event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::progression::Progression;
    use crate::storage::ALL_KEYS;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        clock: Arc<ManualClock>,
        tracker: Tracker,
    }

    async fn fixture(clock: ManualClock) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(clock);
        let tracker = Tracker::open(
            Storage::new(dir.path()),
            clock.clone(),
            TrackerPolicy::default(),
        )
        .await;
        Fixture {
            _dir: dir,
            clock,
            tracker,
        }
    }

    #[tokio::test]
    async fn task_done_before_deadline_is_on_time() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let task = fx.tracker.add_task("Meditate", "23:59").await.unwrap();

        fx.clock.advance(Duration::hours(2));
        let result = fx.tracker.complete_task(task.id).await.unwrap();
        let done = result.task.unwrap();
        assert!(result.completed);
        assert!(done.completed_on_time);
        assert!(done.completed_at.unwrap() <= done.deadline_ts);
        assert!(result.events.contains(&TrackerEvent::DayComplete));
        assert!(result.events.contains(&TrackerEvent::BadgeUnlocked {
            badge: "Beginner".into()
        }));
    }

    #[tokio::test]
    async fn invalid_task_leaves_state_untouched() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let err = fx.tracker.add_task("", "10:00").await.unwrap_err();
        assert!(err.is_validation());
        assert!(fx.tracker.data().tasks.is_empty());
    }

    #[tokio::test]
    async fn second_completion_changes_nothing() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let task = fx.tracker.add_task("Run", "09:00").await.unwrap();
        fx.tracker.complete_task(task.id).await.unwrap();
        let once = fx.tracker.data().clone();

        fx.clock.advance(Duration::hours(1));
        let again = fx.tracker.complete_task(task.id).await.unwrap();
        assert!(!again.completed);
        assert!(again.events.is_empty());
        assert_eq!(fx.tracker.data(), &once);
        assert_eq!(fx.tracker.data().progression.total_completed_tasks, 1);

        let missing = fx.tracker.complete_task(12345).await.unwrap();
        assert!(!missing.completed);
        assert!(missing.task.is_none());
    }

    #[tokio::test]
    async fn late_completion_does_not_complete_the_day() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let task = fx.tracker.add_task("Run", "08:30").await.unwrap();
        fx.clock.advance(Duration::hours(1));

        let result = fx.tracker.complete_task(task.id).await.unwrap();
        assert!(!result.task.unwrap().completed_on_time);
        assert!(!result.events.contains(&TrackerEvent::DayComplete));
        assert_eq!(fx.tracker.data().progression.total_completed_tasks, 1);
    }

    #[tokio::test]
    async fn midnight_evaluation_closes_yesterday() {
        // Thursday 2026-04-02.
        let mut fx = fixture(ManualClock::at(2026, 4, 2, 9, 0, 0)).await;
        let done = fx.tracker.add_task("Done", "18:00").await.unwrap();
        fx.tracker.add_task("Skipped", "18:00").await.unwrap();
        fx.tracker.complete_task(done.id).await.unwrap();
        fx.tracker.data.progression.streak = 6;

        fx.clock.set(2026, 4, 3, 0, 0, 5);
        let outcome = fx.tracker.run_daily_evaluation().await.unwrap().unwrap();

        assert_eq!(outcome.day.to_string(), "2026-04-02");
        assert_eq!(outcome.streak, 7);
        assert_eq!(outcome.level, 2);
        let data = fx.tracker.data();
        assert!(data.tasks.is_empty());
        assert_eq!(data.progression.week_data[3], 1);
        assert!(fx
            .tracker
            .notifications()
            .iter()
            .any(|n| n.event == TrackerEvent::StreakMilestone { streak: 7, level: 2 }));
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let task = fx.tracker.add_task("Stretch", "21:00").await.unwrap();
        fx.tracker.complete_task(task.id).await.unwrap();

        let reopened = Tracker::open(
            Storage::new(fx._dir.path()),
            fx.clock.clone(),
            TrackerPolicy::default(),
        )
        .await;
        assert_eq!(reopened.data(), fx.tracker.data());
    }

    #[tokio::test]
    async fn reminders_fire_once_and_persist() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let task = fx.tracker.add_task("Call mom", "08:20").await.unwrap();

        let events = fx.tracker.scan_reminders().await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(fx.tracker.scan_reminders().await.unwrap().is_empty());

        let reopened = Storage::new(fx._dir.path()).load().await;
        assert!(reopened.tasks.get(task.id).unwrap().reminder_notified);
    }

    #[tokio::test]
    async fn reset_restores_defaults_and_removes_entries() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let task = fx.tracker.add_task("Read", "22:00").await.unwrap();
        fx.tracker.complete_task(task.id).await.unwrap();
        fx.tracker.run_daily_evaluation().await.unwrap();

        fx.tracker.reset().await.unwrap();
        let data = fx.tracker.data();
        assert_eq!(data.progression, Progression::default());
        assert!(data.tasks.is_empty());
        assert!(fx.tracker.notifications().is_empty());
        for key in ALL_KEYS {
            assert!(!fx._dir.path().join(format!("{key}.json")).exists());
        }
    }

    #[tokio::test]
    async fn snapshot_reports_progress_and_status() {
        let mut fx = fixture(ManualClock::at(2026, 4, 1, 8, 0, 0)).await;
        let a = fx.tracker.add_task("A", "09:00").await.unwrap();
        fx.tracker.add_task("B", "10:00").await.unwrap();
        fx.tracker.complete_task(a.id).await.unwrap();

        let snapshot = fx.tracker.snapshot();
        assert_eq!(snapshot.date, "2026-04-01");
        assert_eq!(snapshot.progress_percent, 50);
        assert_eq!(snapshot.tasks[0].status, "Done on-time");
        assert_eq!(snapshot.tasks[1].status, "120 min left");
        assert_eq!(snapshot.week.len(), 7);
        assert_eq!(snapshot.badges, vec!["Beginner".to_string()]);
    }

    #[tokio::test]
    async fn same_day_is_closed_only_once() {
        let mut fx = fixture(ManualClock::at(2026, 4, 3, 0, 0, 5)).await;
        let first = fx.tracker.run_daily_evaluation().await.unwrap();
        assert_eq!(first.map(|o| o.streak), Some(1));

        fx.clock.advance(Duration::minutes(10));
        assert!(fx.tracker.run_daily_evaluation().await.unwrap().is_none());

        // Wall clock stepping back across midnight must not reopen an earlier day.
        fx.clock.set(2026, 4, 2, 23, 59, 58);
        assert!(fx.tracker.run_daily_evaluation().await.unwrap().is_none());
        assert_eq!(fx.tracker.data().progression.streak, 1);
        assert_eq!(fx.tracker.data().progression.week_data, [0; 7]);

        fx.clock.set(2026, 4, 4, 0, 0, 5);
        let next = fx.tracker.run_daily_evaluation().await.unwrap().unwrap();
        assert_eq!(next.day.to_string(), "2026-04-03");
        assert_eq!(next.streak, 2);
    }

    #[tokio::test]
    async fn failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let clock = Arc::new(ManualClock::at(2026, 4, 1, 8, 0, 0));
        let mut data = AppData::default();
        let id = data.tasks.add("Run", "23:00", clock.as_ref()).unwrap().id;
        let mut tracker = Tracker::new(
            data.clone(),
            Storage::new(&blocker),
            clock.clone(),
            TrackerPolicy::default(),
        );

        assert!(tracker.complete_task(id).await.is_err());
        assert_eq!(tracker.data(), &data);
        assert!(tracker.notifications().is_empty());

        assert!(tracker.add_task("Read", "22:00").await.is_err());
        assert!(tracker.run_daily_evaluation().await.is_err());
        assert_eq!(tracker.data(), &data);
    }
}
