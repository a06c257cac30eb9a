//! Derivation engine.
//!
//! Every statistic shown to the user is a pure function of the stored
//! entries, the settings, and an explicit "now":
//!
//! 1. [`calendar`] buckets entries by Monday-start week and by month.
//! 2. [`streak`] applies the habit-day thresholds.
//! 3. [`reward`] turns met weeks into points.
//! 4. [`projection`] projects the month-end total.
//!
//! Nothing is cached or persisted; call [`compute_stats`] again after any
//! write.

pub mod calendar;
pub mod projection;
pub mod reward;
pub mod streak;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::storage::types::{Entry, Settings};
use calendar::{week_start, CalendarIndex, MonthKey};
use streak::{PeriodTally, WeekStatus};

pub use projection::Projection;
pub use streak::Interpersonal;

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub as_of: NaiveDateTime,
    pub today: NaiveDate,
    pub this_week: WeekStats,
    pub this_month: MonthStats,
    pub points: Points,
    pub interpersonal: Interpersonal,
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekStats {
    pub week_start: NaiveDate,
    pub entry_days: u32,
    pub habit_days: u32,
    /// Once met, the week in progress already counts in `points`.
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthStats {
    pub month: MonthKey,
    pub entry_days: u32,
    pub habit_days: u32,
    /// Weeks of this month that have fully ended.
    pub weeks: Vec<WeekStatus>,
    pub met_weeks: u32,
    pub all_weeks_met: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Points {
    pub total: u64,
    pub qualifying_weeks: u32,
    pub weekly_reward_base: u32,
    pub next_period_weekly_reward: u32,
}

/// Compute all statistics for `entries` as of `now` (local time).
///
/// Entries may come in any order. Each date is expected at most once; the
/// storage engine guarantees it, and duplicates count as a single day.
pub fn compute_stats(entries: &[Entry], settings: &Settings, now: NaiveDateTime) -> Stats {
    let today = now.date();
    let index = CalendarIndex::build(entries);

    let current_week = week_start(today);
    let week = PeriodTally::of(index.week(current_week).iter().copied());

    let month = MonthKey::of(today);
    let month_tally = PeriodTally::of(index.month(month).iter().copied());
    let coverage = streak::month_coverage(&index, month, now);

    let rewards = reward::total_points(&index);
    let points = Points {
        total: rewards.total,
        qualifying_weeks: rewards.qualifying_weeks,
        weekly_reward_base: reward::WEEKLY_REWARD_BASE,
        next_period_weekly_reward: reward::next_period_reward(coverage.all_weeks_met),
    };

    let interpersonal = streak::interpersonal_unlock(entries, today);
    let projection = projection::project(points.total, settings.savings_ratio, month_tally.habit_days);

    debug!(
        entries = entries.len(),
        total = points.total,
        month = %month,
        "computed stats"
    );

    Stats {
        as_of: now,
        today,
        this_week: WeekStats {
            week_start: current_week,
            entry_days: week.entry_days,
            habit_days: week.habit_days,
            met: week.met(),
        },
        this_month: MonthStats {
            month,
            entry_days: month_tally.entry_days,
            habit_days: month_tally.habit_days,
            weeks: coverage.weeks,
            met_weeks: coverage.met_weeks,
            all_weeks_met: coverage.all_weeks_met,
        },
        points,
        interpersonal,
        projection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{NewEntry, SavingsRatio};
    use chrono::{Duration, Utc};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn habit_day(d: NaiveDate) -> Entry {
        NewEntry::new(d, "write it down", vec!["coffee".into()])
            .with_habits(["read"])
            .into_entry(Utc::now())
    }

    #[test]
    fn test_empty_input() {
        let stats = compute_stats(&[], &Settings::default(), at("2024-03-13T10:00:00"));
        assert_eq!(stats.points.total, 0);
        assert_eq!(stats.points.next_period_weekly_reward, 10);
        assert_eq!(stats.this_week.habit_days, 0);
        assert!(!stats.this_week.met);
        assert!(!stats.this_month.all_weeks_met);
        assert!(!stats.interpersonal.unlocked);
        assert_eq!(stats.interpersonal.total_weeks, 8);
        assert_eq!(stats.projection.projected_month_end, 0);
        assert!(!stats.projection.bonus_active);
    }

    #[test]
    fn test_current_week_counts_toward_total() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let entries: Vec<Entry> = (0..3).map(|i| habit_day(monday + Duration::days(i))).collect();
        let stats = compute_stats(&entries, &Settings::default(), at("2024-03-13T20:00:00"));

        assert_eq!(stats.this_week.week_start, monday);
        assert!(stats.this_week.met);
        assert_eq!(stats.points.total, 10);
        // The week has not ended, so it does not appear in the month check.
        assert!(stats.this_month.weeks.iter().all(|w| w.week_start != monday));
    }

    #[test]
    fn test_projection_uses_month_habit_days() {
        // Four met weeks in March 2024 with 12 habit days inside March.
        let mut entries = Vec::new();
        for week in 0..4 {
            let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap() + Duration::days(7 * week);
            entries.extend((0..3).map(|i| habit_day(monday + Duration::days(i))));
        }
        let settings = Settings {
            savings_ratio: SavingsRatio::Quarter,
            ..Settings::default()
        };
        let stats = compute_stats(&entries, &settings, at("2024-03-30T12:00:00"));

        assert_eq!(stats.this_month.habit_days, 12);
        assert!(stats.projection.bonus_active);
        assert_eq!(stats.points.total, 40);
        assert_eq!(stats.projection.projected_month_end, 42);
    }

    #[test]
    fn test_stats_serialize_shape() {
        let stats = compute_stats(&[], &Settings::default(), at("2024-03-13T10:00:00"));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["today"], "2024-03-13");
        assert_eq!(json["this_month"]["month"], "2024-03");
        assert_eq!(json["projection"]["savings_ratio"], 0.0);
        assert_eq!(json["interpersonal"]["required_weeks"], 6);

        let mut week: Vec<&str> = json["this_week"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        week.sort_unstable();
        assert_eq!(week, vec!["entry_days", "habit_days", "met", "week_start"]);
    }
}
