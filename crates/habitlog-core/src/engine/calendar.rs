//! Calendar indexing: Monday-start weeks and calendar months.
//!
//! Dates are local calendar days. Nothing here converts through UTC, so a
//! day never shifts into the neighbouring week because of an offset.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

use crate::storage::types::Entry;

/// Monday of the week containing `date`. This is the week key.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Week key as an ISO date string, e.g. `2024-03-04`.
pub fn week_key(date: NaiveDate) -> String {
    week_start(date).format("%Y-%m-%d").to_string()
}

/// Last instant of the week containing `date` (Sunday 23:59:59.999).
pub fn week_end(date: NaiveDate) -> NaiveDateTime {
    let sunday = week_start(date) + Duration::days(6);
    sunday.and_time(end_of_day())
}

/// Whether the week starting at `monday` has fully elapsed at `now`.
pub fn week_elapsed(monday: NaiveDate, now: NaiveDateTime) -> bool {
    week_end(monday) <= now
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// A calendar month, displayed as `YYYY-MM`. Holds the month's first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    pub fn last_day(self) -> NaiveDate {
        // Day 1 + 31 always lands in the following month.
        let next = Self::of(self.0 + Duration::days(31));
        next.0 - Duration::days(1)
    }

    /// Number of days in the month.
    pub fn len_days(self) -> u32 {
        self.last_day().day()
    }

    /// Mondays of every week that intersects this month, in order.
    ///
    /// The first one may fall in the previous month.
    pub fn week_starts(self) -> Vec<NaiveDate> {
        let last = self.last_day();
        let mut cursor = week_start(self.first_day());
        let mut weeks = Vec::new();
        while cursor <= last {
            weeks.push(cursor);
            cursor += Duration::days(7);
        }
        weeks
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Entries grouped by week key and by month key.
///
/// Built fresh from a snapshot on every computation; buckets borrow the
/// entries rather than copying them.
#[derive(Debug, Default)]
pub struct CalendarIndex<'a> {
    weeks: BTreeMap<NaiveDate, Vec<&'a Entry>>,
    months: BTreeMap<MonthKey, Vec<&'a Entry>>,
}

impl<'a> CalendarIndex<'a> {
    pub fn build(entries: &'a [Entry]) -> Self {
        entries.iter().fold(Self::default(), |mut index, entry| {
            index
                .weeks
                .entry(week_start(entry.date))
                .or_default()
                .push(entry);
            index
                .months
                .entry(MonthKey::of(entry.date))
                .or_default()
                .push(entry);
            index
        })
    }

    /// Entries in the week starting at `monday` (empty if none).
    pub fn week(&self, monday: NaiveDate) -> &[&'a Entry] {
        self.weeks.get(&monday).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries in a month (empty if none).
    pub fn month(&self, key: MonthKey) -> &[&'a Entry] {
        self.months.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every week bucket, oldest first.
    pub fn weeks(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Entry])> + '_ {
        self.weeks.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::NewEntry;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(s: &str) -> Entry {
        NewEntry::new(date(s), "reply to mail", vec!["tea".into()]).into_entry(Utc::now())
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-03-04 is a Monday.
        assert_eq!(week_start(date("2024-03-04")), date("2024-03-04"));
        assert_eq!(week_start(date("2024-03-06")), date("2024-03-04"));
        assert_eq!(week_start(date("2024-03-10")), date("2024-03-04"));
        assert_eq!(week_start(date("2024-03-11")), date("2024-03-11"));
    }

    #[test]
    fn test_week_start_crosses_year_and_leap_day() {
        assert_eq!(week_start(date("2025-01-01")), date("2024-12-30"));
        assert_eq!(week_start(date("2024-02-29")), date("2024-02-26"));
        assert_eq!(week_key(date("2025-01-01")), "2024-12-30");
    }

    #[test]
    fn test_week_end_is_last_millisecond_of_sunday() {
        let end = week_end(date("2024-03-06"));
        assert_eq!(end.date(), date("2024-03-10"));
        assert_eq!(end.time(), NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
    }

    #[test]
    fn test_week_elapsed_boundary() {
        let monday = date("2024-03-04");
        let sunday_evening = date("2024-03-10").and_hms_opt(23, 59, 0).unwrap();
        let next_monday = date("2024-03-11").and_hms_opt(0, 0, 0).unwrap();
        assert!(!week_elapsed(monday, sunday_evening));
        assert!(week_elapsed(monday, next_monday));
    }

    #[test]
    fn test_month_key_display_and_bounds() {
        let key = MonthKey::of(date("2024-02-10"));
        assert_eq!(key.to_string(), "2024-02");
        assert_eq!(key.last_day(), date("2024-02-29"));
        assert_eq!(MonthKey::of(date("2023-12-31")).last_day(), date("2023-12-31"));
        assert_eq!(MonthKey::of(date("2023-02-01")).len_days(), 28);
        assert_eq!(key.first_day(), date("2024-02-01"));
    }

    #[test]
    fn test_month_week_starts_include_leading_partial_week() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let weeks = MonthKey::of(date("2024-03-15")).week_starts();
        assert_eq!(weeks.first(), Some(&date("2024-02-26")));
        assert_eq!(weeks.last(), Some(&date("2024-03-25")));
        assert_eq!(weeks.len(), 5);
    }

    #[test]
    fn test_index_buckets_by_week_and_month() {
        let entries = vec![
            entry("2024-02-28"),
            entry("2024-03-01"),
            entry("2024-03-04"),
        ];
        let index = CalendarIndex::build(&entries);

        assert_eq!(index.week(date("2024-02-26")).len(), 2);
        assert_eq!(index.week(date("2024-03-04")).len(), 1);
        assert!(index.week(date("2024-03-11")).is_empty());
        assert_eq!(index.month(MonthKey::of(date("2024-03-01"))).len(), 2);
        assert_eq!(index.weeks().count(), 2);
    }
}
