use crate::errors::TrackerError;
use chrono::{NaiveTime, Weekday};
use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// Tunable rules for streaks, levels, reminders and the daily close-out.
#[derive(Debug, Clone)]
pub struct TrackerPolicy {
    /// Missed tasks at which a day breaks the streak.
    pub missed_threshold: usize,
    /// Level goes up each time the streak reaches a multiple of this.
    pub level_up_every: u32,
    /// Weekday stored in slot 0 of the weekly history.
    pub week_start: Weekday,
    pub reminder_interval: Duration,
    /// How close to its deadline a pending task gets a reminder.
    pub reminder_window: chrono::Duration,
    /// Local time-of-day the daily evaluation fires.
    pub evaluation_time: NaiveTime,
}

impl Default for TrackerPolicy {
    fn default() -> Self {
        Self {
            missed_threshold: 3,
            level_up_every: 7,
            week_start: Weekday::Mon,
            reminder_interval: Duration::from_secs(60),
            reminder_window: chrono::Duration::minutes(30),
            evaluation_time: NaiveTime::from_hms_opt(0, 0, 5).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub port: u16,
    pub policy: TrackerPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, TrackerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TrackerError> {
        let defaults = TrackerPolicy::default();

        let data_dir = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let port = parse_var(&lookup, "PORT")?.unwrap_or(8080);

        let reminder_interval = parse_var::<u64>(&lookup, "REMINDER_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.reminder_interval);
        if reminder_interval.is_zero() {
            return Err(TrackerError::Config {
                key: "REMINDER_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        let level_up_every = parse_var(&lookup, "LEVEL_UP_EVERY")?.unwrap_or(defaults.level_up_every);
        if level_up_every == 0 {
            return Err(TrackerError::Config {
                key: "LEVEL_UP_EVERY",
                value: "0".to_string(),
            });
        }

        let reminder_window = match parse_var::<i64>(&lookup, "REMINDER_WINDOW_MINS")? {
            Some(mins) if mins < 0 => {
                return Err(TrackerError::Config {
                    key: "REMINDER_WINDOW_MINS",
                    value: mins.to_string(),
                });
            }
            Some(mins) => chrono::Duration::minutes(mins),
            None => defaults.reminder_window,
        };

        let policy = TrackerPolicy {
            missed_threshold: parse_var(&lookup, "MISSED_THRESHOLD")?
                .unwrap_or(defaults.missed_threshold),
            level_up_every,
            week_start: parse_var(&lookup, "WEEK_START")?.unwrap_or(defaults.week_start),
            reminder_interval,
            reminder_window,
            evaluation_time: match lookup("EVALUATION_TIME") {
                Some(value) => crate::tasks::parse_time_of_day(&value).map_err(|_| {
                    TrackerError::Config {
                        key: "EVALUATION_TIME",
                        value,
                    }
                })?,
                None => defaults.evaluation_time,
            },
        };

        Ok(Self {
            data_dir,
            port,
            policy,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, TrackerError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| TrackerError::Config { key, value }),
        None => Ok(None),
    }
}
