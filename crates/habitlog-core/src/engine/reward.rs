//! Weekly reward points.

use super::calendar::CalendarIndex;
use super::streak::PeriodTally;

/// Points earned by each week that meets the habit-day threshold.
pub const WEEKLY_REWARD_BASE: u32 = 10;

/// Weekly reward shown for the next period once every elapsed week of the
/// current month is met.
pub const WEEKLY_REWARD_UPGRADED: u32 = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewardTotal {
    pub total: u64,
    pub qualifying_weeks: u32,
}

/// Sum the reward over the whole history. Each qualifying week pays once.
pub fn total_points(index: &CalendarIndex<'_>) -> RewardTotal {
    let qualifying_weeks = index
        .weeks()
        .filter(|(_, bucket)| PeriodTally::of(bucket.iter().copied()).met())
        .count();
    let qualifying_weeks = u32::try_from(qualifying_weeks).unwrap_or(u32::MAX);
    RewardTotal {
        total: u64::from(qualifying_weeks) * u64::from(WEEKLY_REWARD_BASE),
        qualifying_weeks,
    }
}

/// Display-only tier for the coming period. Never feeds back into totals.
pub fn next_period_reward(all_weeks_met: bool) -> u32 {
    if all_weeks_met {
        WEEKLY_REWARD_UPGRADED
    } else {
        WEEKLY_REWARD_BASE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{Entry, NewEntry};
    use chrono::{Duration, NaiveDate, Utc};

    fn week(monday: NaiveDate, habit_days: i64, plain_days: i64) -> Vec<Entry> {
        (0..habit_days + plain_days)
            .map(|i| {
                let entry = NewEntry::new(monday + Duration::days(i), "stretch", vec!["sun".into()]);
                let entry = if i < habit_days { entry.with_habits(["run"]) } else { entry };
                entry.into_entry(Utc::now())
            })
            .collect()
    }

    #[test]
    fn test_each_met_week_pays_once() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let mut entries = week(monday, 7, 0);
        entries.extend(week(monday + Duration::days(7), 3, 4));
        entries.extend(week(monday + Duration::days(14), 2, 5));

        let points = total_points(&CalendarIndex::build(&entries));
        assert_eq!(points.qualifying_weeks, 2);
        assert_eq!(points.total, 20);
    }

    #[test]
    fn test_empty_history_has_no_points() {
        assert_eq!(total_points(&CalendarIndex::build(&[])), RewardTotal::default());
    }

    #[test]
    fn test_next_period_reward() {
        assert_eq!(next_period_reward(true), 12);
        assert_eq!(next_period_reward(false), 10);
    }
}
