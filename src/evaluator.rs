use crate::config::TrackerPolicy;
use crate::events::TrackerEvent;
use crate::models::AppData;
use crate::progression::week_slot;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    /// The calendar day that was closed out.
    pub day: NaiveDate,
    pub on_time_count: u32,
    pub missed_count: usize,
    pub streak: u32,
    pub level: u32,
    pub leveled_up: bool,
    pub events: Vec<TrackerEvent>,
}

/// Applies the close-out of `day` to `data`. Tasks completed late count as
/// missed; the task list is empty afterwards.
pub fn evaluate_day(data: &mut AppData, day: NaiveDate, policy: &TrackerPolicy) -> EvaluationOutcome {
    let on_time = data.tasks.on_time_count();
    let missed_count = data.tasks.len() - on_time;
    let on_time_count = u32::try_from(on_time).unwrap_or(u32::MAX);

    let progression = &mut data.progression;
    if missed_count >= policy.missed_threshold {
        progression.streak = 0;
    } else {
        progression.streak = progression.streak.saturating_add(1);
    }

    let mut events = Vec::new();
    let leveled_up = progression.streak > 0 && progression.streak % policy.level_up_every.max(1) == 0;
    if leveled_up {
        progression.level = progression.level.saturating_add(1);
        events.push(TrackerEvent::StreakMilestone {
            streak: progression.streak,
            level: progression.level,
        });
    }

    progression.week_data[week_slot(day, policy.week_start)] = on_time_count;
    data.tasks.clear();

    EvaluationOutcome {
        day,
        on_time_count,
        missed_count,
        streak: data.progression.streak,
        level: data.progression.level,
        leveled_up,
        events,
    }
}
