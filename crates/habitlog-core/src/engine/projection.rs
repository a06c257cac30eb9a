//! End-of-month projection from the point total and the savings ratio.

use serde::Serialize;

use crate::storage::types::SavingsRatio;

/// Habit days in the current month that activate the bonus rate.
pub const BONUS_HABIT_DAY_THRESHOLD: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub savings_ratio: SavingsRatio,
    pub bonus_days: u32,
    pub bonus_threshold: u32,
    pub bonus_active: bool,
    pub gain_rate: f64,
    pub projected_month_end: u64,
}

/// Monthly gain rate for a savings ratio.
pub fn gain_rate(ratio: SavingsRatio, bonus_active: bool) -> f64 {
    match ratio {
        SavingsRatio::Half => 0.03,
        SavingsRatio::Quarter if bonus_active => 0.04,
        SavingsRatio::Quarter => 0.01,
        SavingsRatio::None => 0.0,
    }
}

/// `total * (1 + rate)`, rounded half away from zero.
pub fn project_total(total: u64, rate: f64) -> u64 {
    // Totals are small multiples of 10; f64 is exact far past any real value.
    (total as f64 * (1.0 + rate)).round() as u64
}

pub fn project(total: u64, ratio: SavingsRatio, month_habit_days: u32) -> Projection {
    let bonus_active = month_habit_days >= BONUS_HABIT_DAY_THRESHOLD;
    let rate = gain_rate(ratio, bonus_active);
    Projection {
        savings_ratio: ratio,
        bonus_days: month_habit_days,
        bonus_threshold: BONUS_HABIT_DAY_THRESHOLD,
        bonus_active,
        gain_rate: rate,
        projected_month_end: project_total(total, rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_rates() {
        assert_eq!(gain_rate(SavingsRatio::Half, false), 0.03);
        assert_eq!(gain_rate(SavingsRatio::Half, true), 0.03);
        assert_eq!(gain_rate(SavingsRatio::Quarter, true), 0.04);
        assert_eq!(gain_rate(SavingsRatio::Quarter, false), 0.01);
        assert_eq!(gain_rate(SavingsRatio::None, true), 0.0);
    }

    #[test]
    fn test_quarter_ratio_with_and_without_bonus() {
        let without = project(20, SavingsRatio::Quarter, 11);
        assert!(!without.bonus_active);
        assert_eq!(without.projected_month_end, 20);

        let with = project(20, SavingsRatio::Quarter, 12);
        assert!(with.bonus_active);
        assert_eq!(with.projected_month_end, 21);
    }

    #[test]
    fn test_project_total_rounds_to_nearest() {
        assert_eq!(project_total(20, 0.04), 21);
        assert_eq!(project_total(20, 0.01), 20);
        assert_eq!(project_total(30, 0.03), 31);
        assert_eq!(project_total(0, 0.04), 0);
    }
}
