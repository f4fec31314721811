//! Monday-to-Monday week window used to scope the dashboard.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Half-open span `[Monday 00:00, next Monday 00:00)` in the viewer's time zone.
#[derive(Debug, Clone)]
pub struct WeekWindow<Tz: TimeZone> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl<Tz: TimeZone> WeekWindow<Tz> {
    /// Returns the week that contains `now`.
    pub fn containing(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let monday = today - Days::new(u64::from(weekday_index(today)));
        let next_monday = monday + Days::new(7);
        Self {
            start: start_of_day(&tz, monday),
            end: start_of_day(&tz, next_monday),
        }
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.with_timezone(&Utc)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.with_timezone(&Utc)
    }

    /// Whether `at` falls inside the window. The start is included, the end is not.
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start && *at < self.end
    }

    /// The seven calendar days of the window, Monday first.
    pub fn days(&self) -> [NaiveDate; 7] {
        let monday = self.start.date_naive();
        std::array::from_fn(|offset| monday + Days::new(offset as u64))
    }
}

/// Day-of-week index with Monday as 0 and Sunday as 6.
///
/// Equivalent to remapping a Sunday-first day number with `(day + 6) % 7`.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Calendar date of `at` as seen in `tz`.
pub fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    // A DST gap can skip local midnight; the day then starts when the gap ends.
    (0..24 * 60)
        .map(|minutes| midnight + Duration::minutes(minutes))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}
