use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::day_samples::MINUTES_PER_DAY;

/// Longest DST gap searched when civil midnight does not exist.
const MAX_GAP_MINUTES: i64 = 180;

/// First valid instant of `date` in `zone`. When midnight falls into a DST
/// gap the earliest instant after the gap is used.
pub fn civil_day_start(date: NaiveDate, zone: Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    for offset in 0..=MAX_GAP_MINUTES {
        let local = midnight + Duration::minutes(offset);
        if let Some(dt) = zone.from_local_datetime(&local).earliest() {
            return dt;
        }
    }
    zone.from_utc_datetime(&midnight)
}

/// The simulation's authoritative clock.
///
/// `current` always satisfies `day_start <= current < day_start + 24h`. A
/// tick past the end of the day subtracts 24h instead of snapping back to
/// `day_start`, which keeps the sub-day phase intact.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCursor {
    zone: Tz,
    date: NaiveDate,
    day_start: DateTime<Tz>,
    day_end: DateTime<Tz>,
    current: DateTime<Tz>,
    recomputes: u64,
}

impl TimeCursor {
    pub fn new(date: NaiveDate, zone: Tz) -> Self {
        let day_start = civil_day_start(date, zone);
        Self {
            zone,
            date,
            day_start,
            day_end: day_start + Duration::hours(24),
            current: day_start,
            recomputes: 0,
        }
    }

    /// Cursor for today's civil day in `zone`.
    pub fn today(zone: Tz) -> Self {
        Self::new(Utc::now().with_timezone(&zone).date_naive(), zone)
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_start(&self) -> &DateTime<Tz> {
        &self.day_start
    }

    pub fn day_end(&self) -> &DateTime<Tz> {
        &self.day_end
    }

    pub fn current(&self) -> &DateTime<Tz> {
        &self.current
    }

    /// Number of times the day bounds were recomputed since creation.
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Recreate the day bounds for `date` in `zone` and rewind to the start.
    pub fn recompute(&mut self, date: NaiveDate, zone: Tz) {
        let day_start = civil_day_start(date, zone);
        self.zone = zone;
        self.date = date;
        self.day_start = day_start;
        self.day_end = day_start + Duration::hours(24);
        self.current = day_start;
        self.recomputes += 1;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.recompute(date, self.zone);
    }

    /// Reinterpret the selected calendar date in a new zone.
    pub fn set_zone(&mut self, zone: Tz) {
        self.recompute(self.date, zone);
    }

    pub fn reset(&mut self) {
        self.current = self.day_start;
    }

    pub fn tick(&mut self) {
        self.current += Duration::minutes(1);
        if self.current - self.day_start >= Duration::hours(24) {
            self.current -= Duration::hours(24);
        }
    }

    /// Whole minutes elapsed since `day_start`, in `0..1440`.
    pub fn minute_index(&self) -> usize {
        let minutes = (self.current - self.day_start).num_minutes();
        minutes.clamp(0, i64::from(MINUTES_PER_DAY) - 1) as usize
    }
}

/// Cursor shared between the simulation (which recreates and resets it) and
/// the scene animation (which ticks it).
#[derive(Debug, Clone)]
pub struct SharedCursor(Arc<Mutex<TimeCursor>>);

impl SharedCursor {
    pub fn new(cursor: TimeCursor) -> Self {
        Self(Arc::new(Mutex::new(cursor)))
    }

    pub fn lock(&self) -> MutexGuard<'_, TimeCursor> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> TimeCursor {
        self.lock().clone()
    }
}
