use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

pub trait Clock: Send + Sync {
    /// Current instant, carrying the local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Maps a local wall-clock reading to an absolute instant. `None` when the
    /// reading does not exist locally (skipped by a DST transition).
    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// The given time-of-day on today's date.
    fn at_time_today(&self, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        self.resolve(self.today().and_time(time))
    }
}

/// Reads the host's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.fixed_offset())
    }
}
