use crate::clock::Clock;
use crate::state::AppState;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Next instant strictly after `now` at which the local clock reads `at`.
/// Days on which `at` does not exist locally are skipped.
pub fn next_fire_after(
    clock: &dyn Clock,
    now: DateTime<FixedOffset>,
    at: NaiveTime,
) -> Option<DateTime<FixedOffset>> {
    let today = now.date_naive();
    (0..=2)
        .filter_map(|offset| clock.resolve((today + Duration::days(offset)).and_time(at)))
        .find(|candidate| *candidate > now)
}

/// Re-arm point for the daily job: never at or before the instant that already
/// fired, even if the wall clock now reads earlier.
pub fn next_evaluation(
    clock: &dyn Clock,
    now: DateTime<FixedOffset>,
    last_fire: Option<DateTime<FixedOffset>>,
    at: NaiveTime,
) -> Option<DateTime<FixedOffset>> {
    let after = last_fire.map_or(now, |fired| fired.max(now));
    next_fire_after(clock, after, at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorState {
    Idle,
    Evaluating,
}

/// Spawns the reminder scanner. The first scan runs one interval after start.
pub fn spawn_reminder_scanner(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = state.tracker.lock().await.policy().reminder_interval;
        info!("reminder scanner started, every {}s", period.as_secs());
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let mut tracker = state.tracker.lock().await;
            match tracker.scan_reminders().await {
                Ok(events) if !events.is_empty() => debug!("{} reminders sent", events.len()),
                Ok(_) => {}
                Err(err) => error!("reminder scan failed: {err}"),
            }
        }
    })
}

/// Spawns the daily evaluator, re-arming after every run.
pub fn spawn_daily_evaluator(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (clock, at) = {
            let tracker = state.tracker.lock().await;
            (tracker.clock(), tracker.policy().evaluation_time)
        };
        let mut phase = EvaluatorState::Idle;
        let mut last_fire: Option<DateTime<FixedOffset>> = None;

        loop {
            let now = clock.now();
            let Some(next) = next_evaluation(clock.as_ref(), now, last_fire, at) else {
                warn!("no valid evaluation time found after {now}, retrying in an hour");
                time::sleep(std::time::Duration::from_secs(3600)).await;
                continue;
            };
            info!(state = ?phase, "next daily evaluation at {next}");
            let wait = (next - now).to_std().unwrap_or_default();
            time::sleep(wait).await;
            last_fire = Some(next);

            phase = EvaluatorState::Evaluating;
            debug!(state = ?phase, "running daily evaluation");
            match state.tracker.lock().await.run_daily_evaluation().await {
                Ok(Some(_)) => {}
                Ok(None) => debug!("evaluation for {next} had nothing to close"),
                Err(err) => error!("daily evaluation failed: {err}"),
            }
            phase = EvaluatorState::Idle;
        }
    })
}
