//! Habit-day thresholds per week and month, and the interpersonal unlock.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::calendar::{week_elapsed, week_start, CalendarIndex, MonthKey};
use crate::storage::types::Entry;

/// Habit days needed in a week for that week to count as met.
pub const WEEKLY_HABIT_DAY_THRESHOLD: u32 = 3;

/// Length of the interpersonal unlock window, in calendar days.
pub const UNLOCK_WINDOW_DAYS: i64 = 56;

/// Met weeks inside the window needed to unlock.
pub const UNLOCK_REQUIRED_WEEKS: u32 = 6;

/// Floor for the reported number of weeks in the window.
pub const UNLOCK_MIN_TOTAL_WEEKS: u32 = 8;

/// Day counts for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTally {
    pub entry_days: u32,
    pub habit_days: u32,
}

impl PeriodTally {
    pub fn of<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut entry_days = BTreeSet::new();
        let mut habit_days = BTreeSet::new();
        for entry in entries {
            entry_days.insert(entry.date);
            if entry.is_habit_day() {
                habit_days.insert(entry.date);
            }
        }
        Self {
            entry_days: count(entry_days.len()),
            habit_days: count(habit_days.len()),
        }
    }

    pub fn met(&self) -> bool {
        self.habit_days >= WEEKLY_HABIT_DAY_THRESHOLD
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// One elapsed week of the current month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekStatus {
    pub week_start: NaiveDate,
    pub entry_days: u32,
    pub habit_days: u32,
    pub met: bool,
}

/// Result of the full-month coverage check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthCoverage {
    pub weeks: Vec<WeekStatus>,
    pub met_weeks: u32,
    pub all_weeks_met: bool,
}

/// Check every week intersecting `month` that has fully ended by `now`.
///
/// Weeks still in progress are skipped. With no elapsed week the month is
/// not considered covered.
pub fn month_coverage(index: &CalendarIndex<'_>, month: MonthKey, now: NaiveDateTime) -> MonthCoverage {
    let weeks: Vec<WeekStatus> = month
        .week_starts()
        .into_iter()
        .filter(|monday| week_elapsed(*monday, now))
        .map(|monday| {
            let tally = PeriodTally::of(index.week(monday).iter().copied());
            WeekStatus {
                week_start: monday,
                entry_days: tally.entry_days,
                habit_days: tally.habit_days,
                met: tally.met(),
            }
        })
        .collect();

    let met_weeks = count(weeks.iter().filter(|w| w.met).count());
    let all_weeks_met = !weeks.is_empty() && weeks.iter().all(|w| w.met);
    MonthCoverage {
        weeks,
        met_weeks,
        all_weeks_met,
    }
}

/// Interpersonal unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpersonal {
    pub met_weeks: u32,
    pub total_weeks: u32,
    pub required_weeks: u32,
    pub unlocked: bool,
}

/// Evaluate the unlock over the 56 days ending on `today`.
///
/// The window is cut at day granularity, so its oldest week and the
/// current week may be partial. Both are counted like any other week.
pub fn interpersonal_unlock(entries: &[Entry], today: NaiveDate) -> Interpersonal {
    let window_start = today - Duration::days(UNLOCK_WINDOW_DAYS - 1);
    let weeks = entries
        .iter()
        .filter(|e| e.date >= window_start && e.date <= today)
        .fold(BTreeMap::<NaiveDate, Vec<&Entry>>::new(), |mut acc, e| {
            acc.entry(week_start(e.date)).or_default().push(e);
            acc
        });

    let met_weeks = count(
        weeks
            .values()
            .filter(|bucket| PeriodTally::of(bucket.iter().copied()).met())
            .count(),
    );
    Interpersonal {
        met_weeks,
        total_weeks: count(weeks.len()).max(UNLOCK_MIN_TOTAL_WEEKS),
        required_weeks: UNLOCK_REQUIRED_WEEKS,
        unlocked: met_weeks >= UNLOCK_REQUIRED_WEEKS,
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

    fn habit_day(d: NaiveDate) -> Entry {
        NewEntry::new(d, "go to bed early", vec!["tea".into()])
            .with_habits(["run"])
            .into_entry(Utc::now())
    }

    fn plain_day(d: NaiveDate) -> Entry {
        NewEntry::new(d, "go to bed early", vec!["tea".into()]).into_entry(Utc::now())
    }

    fn days(start: &str, n: i64) -> Vec<NaiveDate> {
        let start = date(start);
        (0..n).map(|i| start + Duration::days(i)).collect()
    }

    #[test]
    fn test_tally_threshold_boundary() {
        let two: Vec<Entry> = days("2024-03-04", 2).into_iter().map(habit_day).collect();
        let three: Vec<Entry> = days("2024-03-04", 3).into_iter().map(habit_day).collect();
        assert!(!PeriodTally::of(&two).met());
        assert!(PeriodTally::of(&three).met());
    }

    #[test]
    fn test_tally_counts_plain_days_as_entries_only() {
        let entries = vec![
            habit_day(date("2024-03-04")),
            plain_day(date("2024-03-05")),
            plain_day(date("2024-03-06")),
        ];
        let tally = PeriodTally::of(&entries);
        assert_eq!(tally.entry_days, 3);
        assert_eq!(tally.habit_days, 1);
        assert!(!tally.met());
    }

    #[test]
    fn test_legacy_bookkeeping_is_habit_day() {
        let legacy = NewEntry::new(date("2024-03-04"), "old style", vec!["tea".into()])
            .with_bookkeeping(true)
            .into_entry(Utc::now());
        assert_eq!(PeriodTally::of([&legacy]).habit_days, 1);
    }

    #[test]
    fn test_month_coverage_skips_unfinished_weeks() {
        // March 2024: weeks of 02-26, 03-04, 03-11, 03-18, 03-25.
        let entries: Vec<Entry> = ["2024-02-26", "2024-03-04"]
            .iter()
            .flat_map(|s| days(s, 3))
            .map(habit_day)
            .collect();
        let index = CalendarIndex::build(&entries);
        let now = date("2024-03-12").and_hms_opt(9, 0, 0).unwrap();

        let coverage = month_coverage(&index, MonthKey::of(now.date()), now);
        assert_eq!(coverage.weeks.len(), 2);
        assert_eq!(coverage.met_weeks, 2);
        assert!(coverage.all_weeks_met);
    }

    #[test]
    fn test_month_coverage_fails_on_any_unmet_week() {
        let mut entries: Vec<Entry> = days("2024-02-26", 3).into_iter().map(habit_day).collect();
        entries.extend(days("2024-03-04", 2).into_iter().map(habit_day));
        let index = CalendarIndex::build(&entries);
        let now = date("2024-03-12").and_hms_opt(9, 0, 0).unwrap();

        let coverage = month_coverage(&index, MonthKey::of(now.date()), now);
        assert_eq!(coverage.met_weeks, 1);
        assert!(!coverage.all_weeks_met);
        assert_eq!(coverage.weeks[1].habit_days, 2);
    }

    #[test]
    fn test_month_coverage_without_elapsed_weeks() {
        // 2024-04-01 is a Monday; nothing in April has ended yet.
        let index = CalendarIndex::build(&[]);
        let now = date("2024-04-03").and_hms_opt(12, 0, 0).unwrap();
        let coverage = month_coverage(&index, MonthKey::of(now.date()), now);
        assert!(coverage.weeks.is_empty());
        assert!(!coverage.all_weeks_met);
    }

    #[test]
    fn test_unlock_six_of_eight() {
        // Sunday 2024-04-28 closes an 8-week window starting Monday 03-04.
        let today = date("2024-04-28");
        let mut entries = Vec::new();
        for week in 0..8 {
            let monday = date("2024-03-04") + Duration::days(7 * week);
            let n = if week < 6 { 3 } else { 1 };
            entries.extend((0..n).map(|d| habit_day(monday + Duration::days(d))));
        }
        let state = interpersonal_unlock(&entries, today);
        assert_eq!(state.met_weeks, 6);
        assert_eq!(state.total_weeks, 8);
        assert!(state.unlocked);
    }

    #[test]
    fn test_unlock_five_of_eight() {
        let today = date("2024-04-28");
        let entries: Vec<Entry> = (0..5)
            .flat_map(|week| days("2024-03-04", 3).into_iter().map(move |d| d + Duration::days(7 * week)))
            .map(habit_day)
            .collect();
        let state = interpersonal_unlock(&entries, today);
        assert_eq!(state.met_weeks, 5);
        assert_eq!(state.total_weeks, 8);
        assert!(!state.unlocked);
    }

    #[test]
    fn test_unlock_ignores_entries_outside_window() {
        let today = date("2024-04-28");
        let entries = vec![habit_day(date("2024-03-03")), habit_day(date("2024-04-29"))];
        let state = interpersonal_unlock(&entries, today);
        assert_eq!(state.met_weeks, 0);
        assert_eq!(state.total_weeks, UNLOCK_MIN_TOTAL_WEEKS);
    }

    #[test]
    fn test_unlock_total_weeks_can_exceed_floor() {
        // Mid-week today: the window touches nine calendar weeks.
        let today = date("2024-05-01");
        let entries: Vec<Entry> = days("2024-03-07", 56).into_iter().map(plain_day).collect();
        let state = interpersonal_unlock(&entries, today);
        assert_eq!(state.total_weeks, 9);
        assert!(!state.unlocked);
    }
}
