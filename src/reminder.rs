use crate::events::TrackerEvent;
use crate::tasks::TaskStore;

/// Flags every pending task whose deadline is at most `window` away,
/// including overdue ones, and returns one reminder per newly flagged task.
pub fn scan(tasks: &mut TaskStore, now: i64, window: chrono::Duration) -> Vec<TrackerEvent> {
    let window_ms = window.num_milliseconds();
    tasks
        .iter_mut()
        .filter(|task| !task.is_completed() && !task.reminder_notified)
        .filter(|task| task.deadline_ts - now <= window_ms)
        .map(|task| {
            task.reminder_notified = true;
            TrackerEvent::ReminderDue {
                task_id: task.id,
                name: task.name.clone(),
                deadline_ts: task.deadline_ts,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::clock::Clock;
    use chrono::Duration;

    #[test]
    fn reminds_only_inside_window() {
        let clock = ManualClock::at(2026, 2, 2, 10, 0, 0);
        let mut tasks = TaskStore::default();
        let soon = tasks.add("Soon", "10:30", &clock).unwrap().id;
        let later = tasks.add("Later", "10:31", &clock).unwrap().id;

        let events = scan(&mut tasks, clock.now_millis(), Duration::minutes(30));
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], TrackerEvent::ReminderDue { task_id, .. } if *task_id == soon));
        assert!(tasks.get(soon).unwrap().reminder_notified);
        assert!(!tasks.get(later).unwrap().reminder_notified);
    }

    #[test]
    fn fires_at_most_once_per_task() {
        let clock = ManualClock::at(2026, 2, 2, 10, 0, 0);
        let mut tasks = TaskStore::default();
        tasks.add("Soon", "10:15", &clock).unwrap();

        assert_eq!(scan(&mut tasks, clock.now_millis(), Duration::minutes(30)).len(), 1);
        clock.advance(Duration::minutes(1));
        assert!(scan(&mut tasks, clock.now_millis(), Duration::minutes(30)).is_empty());
    }

    #[test]
    fn skips_completed_and_covers_overdue() {
        let clock = ManualClock::at(2026, 2, 2, 10, 0, 0);
        let mut tasks = TaskStore::default();
        let done = tasks.add("Done", "10:10", &clock).unwrap().id;
        tasks.complete(done, clock.now_millis());
        let overdue = tasks.add("Overdue", "09:00", &clock).unwrap().id;

        let events = scan(&mut tasks, clock.now_millis(), Duration::minutes(30));
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], TrackerEvent::ReminderDue { task_id, .. } if *task_id == overdue));
    }
}
