//! Calendar period boundaries.
//!
//! Periods are half-open `[start, end)` intervals in UTC, derived from local
//! calendar dates: a day runs from local midnight to the next local midnight,
//! a week from the most recent Monday, a month from the first of the month.

use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, Months, NaiveDate, NaiveTime, TimeZone, Utc,
};

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
#[must_use]
pub fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible
            // Use 1am local which is guaranteed to exist
            let one_am = local_date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            Local
                .from_local_datetime(&one_am)
                .unwrap()
                .with_timezone(&Utc)
        }
    }
}

/// Calculates day boundaries (00:00 to next 00:00 local time).
#[must_use]
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date + Duration::days(1);
    (local_midnight_to_utc(date), local_midnight_to_utc(next))
}

/// Calculates week boundaries (Mon 00:00 to next Mon 00:00 local time).
#[must_use]
pub fn week_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let days_since_monday = date.weekday().num_days_from_monday();
    let monday = date - Duration::days(i64::from(days_since_monday));
    let next_monday = monday + Duration::days(7);

    (local_midnight_to_utc(monday), local_midnight_to_utc(next_monday))
}

/// Calculates month boundaries (1st 00:00 to next month's 1st 00:00 local time).
#[must_use]
pub fn month_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = date.with_day(1).unwrap();
    let next_first = first + Months::new(1);

    (local_midnight_to_utc(first), local_midnight_to_utc(next_first))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_for_known_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let (start, end) = day_bounds(date);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2025, 1, 29).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 1, 30).unwrap());
    }

    #[test]
    fn test_week_bounds_for_known_date() {
        // Jan 29, 2025 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let (start, end) = week_bounds(wednesday);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn test_week_bounds_on_monday() {
        let monday = NaiveDate::from_ymd_opt(2025, 1, 27).unwrap();
        let (start, end) = week_bounds(monday);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn test_week_bounds_on_sunday() {
        // Feb 2, 2025 is a Sunday: still part of the week starting Jan 27
        let sunday = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        let (start, end) = week_bounds(sunday);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2025, 1, 27).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn test_month_bounds_for_known_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let (start, end) = month_bounds(date);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }

    #[test]
    fn test_month_bounds_december_rolls_over() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        let (start, end) = month_bounds(date);

        let start_local = start.with_timezone(&Local).date_naive();
        let end_local = end.with_timezone(&Local).date_naive();

        assert_eq!(start_local, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(end_local, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_bounds_are_half_open_and_contiguous() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 29).unwrap();
        let (_, end) = day_bounds(date);
        let (next_start, _) = day_bounds(date + Duration::days(1));
        assert_eq!(end, next_start);
    }
}
