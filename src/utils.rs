//! Calendar-day helpers shared by the store implementations and the rules.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// Half-open UTC bounds `[00:00, +1d)` of a calendar day, for filtering
/// `timestamptz` columns by day.
pub fn day_bounds_utc(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Day formatting used in alert messages.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// Compact day formatting used in multi-day breakdowns.
pub fn format_day_short(day: NaiveDate) -> String {
    day.format("%d/%m").to_string()
}
