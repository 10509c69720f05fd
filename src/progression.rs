use crate::events::TrackerEvent;
use crate::models::WeekPoint;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

pub const WEEK_SLOTS: usize = 7;

#[derive(Debug, Clone, Copy)]
pub struct BadgeRule {
    pub threshold: u64,
    pub name: &'static str,
    pub icon: &'static str,
}

/// Ascending by threshold.
pub const BADGE_RULES: [BadgeRule; 6] = [
    BadgeRule { threshold: 1, name: "Beginner", icon: "🍼" },
    BadgeRule { threshold: 5, name: "Rookie", icon: "⚡" },
    BadgeRule { threshold: 10, name: "Focus Warrior", icon: "🔥" },
    BadgeRule { threshold: 20, name: "Discipline Beast", icon: "💪" },
    BadgeRule { threshold: 30, name: "Elite Performer", icon: "🎯" },
    BadgeRule { threshold: 50, name: "Unstoppable", icon: "👑" },
];

pub fn badge_icon(name: &str) -> Option<&'static str> {
    BADGE_RULES
        .iter()
        .find(|rule| rule.name == name)
        .map(|rule| rule.icon)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub streak: u32,
    pub total_completed_tasks: u64,
    /// Unlock order, no duplicates.
    pub badges: Vec<String>,
    pub week_data: [u32; WEEK_SLOTS],
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            streak: 0,
            total_completed_tasks: 0,
            badges: Vec::new(),
            week_data: [0; WEEK_SLOTS],
        }
    }
}

impl Progression {
    /// Counts one more finished task and unlocks whatever badges it earns.
    pub fn record_completion(&mut self) -> Vec<TrackerEvent> {
        self.total_completed_tasks = self.total_completed_tasks.saturating_add(1);
        self.check_badges()
    }

    /// Grants every badge whose threshold is met and that is not yet held.
    /// All rules are checked on every call.
    pub fn check_badges(&mut self) -> Vec<TrackerEvent> {
        let mut unlocked = Vec::new();
        for rule in BADGE_RULES.iter() {
            if self.total_completed_tasks >= rule.threshold && !self.has_badge(rule.name) {
                self.badges.push(rule.name.to_string());
                unlocked.push(TrackerEvent::BadgeUnlocked {
                    badge: rule.name.to_string(),
                });
            }
        }
        unlocked
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.badges.iter().any(|badge| badge == name)
    }

    pub fn streak_tier(&self) -> StreakTier {
        StreakTier::from_streak(self.streak)
    }

    /// Week history in slot order, labelled from `week_start`.
    pub fn week_chart(&self, week_start: Weekday) -> Vec<WeekPoint> {
        let mut day = week_start;
        self.week_data
            .iter()
            .map(|&on_time| {
                let point = WeekPoint {
                    day: day_label(day).to_string(),
                    on_time,
                };
                day = day.succ();
                point
            })
            .collect()
    }
}

/// Slot of `date` in the weekly history: days since `week_start`.
pub fn week_slot(date: NaiveDate, week_start: Weekday) -> usize {
    let day = date.weekday().num_days_from_monday();
    let start = week_start.num_days_from_monday();
    ((day + 7 - start) % 7) as usize
}

fn day_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Display tier for the current streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    None,
    /// 1-2 days.
    Spark,
    /// 3-6 days.
    Flame,
    /// 7-14 days.
    Blaze,
    /// 15 days and up.
    Crown,
}

impl StreakTier {
    pub fn from_streak(streak: u32) -> Self {
        match streak {
            0 => Self::None,
            1..=2 => Self::Spark,
            3..=6 => Self::Flame,
            7..=14 => Self::Blaze,
            _ => Self::Crown,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::None => "⚪",
            Self::Spark => "✨",
            Self::Flame => "🔥",
            Self::Blaze => "🔥🔥",
            Self::Crown => "👑🔥🔥",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_badges(total: u64) -> Vec<String> {
        BADGE_RULES
            .iter()
            .filter(|rule| rule.threshold <= total)
            .map(|rule| rule.name.to_string())
            .collect()
    }

    #[test]
    fn fifth_completion_unlocks_rookie() {
        let mut progression = Progression {
            total_completed_tasks: 4,
            badges: vec!["Beginner".to_string()],
            ..Progression::default()
        };

        let events = progression.record_completion();
        assert_eq!(progression.total_completed_tasks, 5);
        assert_eq!(
            events,
            vec![TrackerEvent::BadgeUnlocked {
                badge: "Rookie".to_string()
            }]
        );
        assert!(progression.has_badge("Rookie"));
    }

    #[test]
    fn badges_track_thresholds_as_total_grows() {
        let mut progression = Progression::default();
        let mut previous = 0;
        for _ in 0..60 {
            progression.record_completion();
            assert!(progression.badges.len() >= previous);
            previous = progression.badges.len();
            assert_eq!(progression.badges, expected_badges(progression.total_completed_tasks));
        }
        assert_eq!(progression.badges.len(), BADGE_RULES.len());
    }

    #[test]
    fn check_badges_catches_up_on_every_missed_rule() {
        let mut progression = Progression {
            total_completed_tasks: 25,
            ..Progression::default()
        };
        let events = progression.check_badges();
        assert_eq!(events.len(), 4);
        assert!(progression.check_badges().is_empty());
    }

    #[test]
    fn streak_tiers_match_boundaries() {
        let cases = [
            (0, StreakTier::None),
            (1, StreakTier::Spark),
            (2, StreakTier::Spark),
            (3, StreakTier::Flame),
            (6, StreakTier::Flame),
            (7, StreakTier::Blaze),
            (14, StreakTier::Blaze),
            (15, StreakTier::Crown),
            (400, StreakTier::Crown),
        ];
        for (streak, tier) in cases {
            assert_eq!(StreakTier::from_streak(streak), tier, "streak {streak}");
        }
    }

    #[test]
    fn week_slot_is_monday_indexed_by_default() {
        let monday = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        assert_eq!(week_slot(monday, Weekday::Mon), 0);
        assert_eq!(week_slot(sunday, Weekday::Mon), 6);
        assert_eq!(week_slot(sunday, Weekday::Sun), 0);
        assert_eq!(week_slot(monday, Weekday::Sun), 1);
    }

    #[test]
    fn week_chart_labels_follow_week_start() {
        let progression = Progression {
            week_data: [1, 2, 3, 4, 5, 6, 7],
            ..Progression::default()
        };
        let chart = progression.week_chart(Weekday::Mon);
        assert_eq!(chart[0].day, "Mon");
        assert_eq!(chart[6].day, "Sun");
        assert_eq!(chart[6].on_time, 7);

        let chart = progression.week_chart(Weekday::Sun);
        assert_eq!(chart[0].day, "Sun");
        assert_eq!(chart[1].day, "Mon");
    }
}
