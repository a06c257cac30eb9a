use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use habitlog_core::compute_stats;
use habitlog_core::storage::{
    Entry, Habit, HabitRef, NewEntry, SavingsRatio, Settings, UNKNOWN_HABIT_LABEL,
};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("valid test time")
}

fn habit_day(date: NaiveDate, habit: &str) -> Entry {
    NewEntry::new(date, "tidy the desk", vec!["friends".into()])
        .with_habits([habit])
        .into_entry(Utc::now())
}

fn plain_day(date: NaiveDate) -> Entry {
    NewEntry::new(date, "tidy the desk", vec!["friends".into()]).into_entry(Utc::now())
}

fn settings() -> Settings {
    Settings {
        savings_ratio: SavingsRatio::Quarter,
        habits: vec![Habit::new("run", "Run"), Habit::new("read", "Read")],
    }
}

/// Habit days on the first `n` days of the week starting at `monday`.
fn week(monday: &str, n: i64) -> Vec<Entry> {
    let monday = day(monday);
    (0..n)
        .map(|i| habit_day(monday + Duration::days(i), "run"))
        .collect()
}

#[test]
fn test_idempotent() {
    let mut entries = week("2024-03-04", 4);
    entries.push(plain_day(day("2024-03-15")));
    let now = at("2024-03-20T08:00:00");

    let first = compute_stats(&entries, &settings(), now);
    let second = compute_stats(&entries, &settings(), now);
    assert_eq!(first, second);

    entries.reverse();
    assert_eq!(compute_stats(&entries, &settings(), now), first);
}

#[test]
fn test_adding_habit_days_never_lowers_totals() {
    let now = at("2024-03-31T20:00:00");
    let mut entries = Vec::new();
    let mut previous = compute_stats(&entries, &settings(), now);

    let start = day("2024-02-26");
    for offset in 0..35 {
        entries.push(habit_day(start + Duration::days(offset), "read"));
        let next = compute_stats(&entries, &settings(), now);

        assert!(next.points.total >= previous.points.total);
        assert!(next.this_month.met_weeks >= previous.this_month.met_weeks);
        assert!(next.interpersonal.met_weeks >= previous.interpersonal.met_weeks);
        assert!(!previous.this_month.all_weeks_met || next.this_month.all_weeks_met);
        previous = next;
    }
    assert_eq!(previous.points.total, 50);
}

#[test]
fn test_threshold_boundary() {
    let now = at("2024-03-11T09:00:00");

    let two = compute_stats(&week("2024-03-04", 2), &settings(), now);
    assert_eq!(two.points.total, 0);

    let three = compute_stats(&week("2024-03-04", 3), &settings(), now);
    assert_eq!(three.points.total, 10);
}

#[test]
fn test_legacy_bookkeeping_matches_habit_completion() {
    let now = at("2024-03-11T09:00:00");
    let monday = day("2024-03-04");

    let legacy: Vec<Entry> = (0..3)
        .map(|i| {
            NewEntry::new(monday + Duration::days(i), "tidy the desk", vec!["friends".into()])
                .with_bookkeeping(true)
                .into_entry(Utc::now())
        })
        .collect();
    let modern = week("2024-03-04", 3);

    let a = compute_stats(&legacy, &settings(), now);
    let b = compute_stats(&modern, &settings(), now);
    assert_eq!(a.points, b.points);
    assert_eq!(a.this_month, b.this_month);
    assert_eq!(a.projection, b.projection);
}

#[test]
fn test_plain_days_count_as_entries_only() {
    let monday = day("2024-03-04");
    let entries: Vec<Entry> = (0..7).map(|i| plain_day(monday + Duration::days(i))).collect();
    let stats = compute_stats(&entries, &settings(), at("2024-03-10T12:00:00"));

    assert_eq!(stats.this_week.entry_days, 7);
    assert_eq!(stats.this_week.habit_days, 0);
    assert!(!stats.this_week.met);
    assert_eq!(stats.points.total, 0);
}

#[test]
fn test_projection_bonus() {
    // Two met weeks before March; March itself decides the bonus.
    let mut entries = week("2024-02-05", 3);
    entries.extend(week("2024-02-12", 3));

    let no_bonus = compute_stats(&entries, &settings(), at("2024-03-20T12:00:00"));
    assert_eq!(no_bonus.points.total, 20);
    assert!(!no_bonus.projection.bonus_active);
    assert_eq!(no_bonus.projection.projected_month_end, 20);

    // Twelve habit days in March, some of them after today.
    for monday in ["2024-03-04", "2024-03-11", "2024-03-18", "2024-03-25"] {
        entries.extend(week(monday, 2));
    }
    for extra in ["2024-03-01", "2024-03-02", "2024-03-03", "2024-03-31"] {
        entries.push(plain_day(day(extra)));
    }
    entries.push(habit_day(day("2024-03-09"), "read"));
    entries.push(habit_day(day("2024-03-16"), "read"));
    entries.push(habit_day(day("2024-03-23"), "read"));
    entries.push(habit_day(day("2024-03-30"), "read"));

    let bonus = compute_stats(&entries, &settings(), at("2024-03-20T12:00:00"));
    assert_eq!(bonus.this_month.habit_days, 12);
    assert!(bonus.projection.bonus_active);
}

#[test]
fn test_quarter_ratio_projection_values() {
    // Exactly two met weeks (20 points) and 12 March habit days.
    let mut entries = week("2024-03-04", 6);
    entries.extend(week("2024-03-11", 6));
    let stats = compute_stats(&entries, &settings(), at("2024-03-17T12:00:00"));

    assert_eq!(stats.points.total, 20);
    assert_eq!(stats.this_month.habit_days, 12);
    assert!(stats.projection.bonus_active);
    assert_eq!(stats.projection.gain_rate, 0.04);
    assert_eq!(stats.projection.projected_month_end, 21);
}

#[test]
fn test_full_month_upgrades_next_reward() {
    // February 2024: weeks of 01-29, 02-05, 02-12, 02-19, 02-26.
    let now = at("2024-02-26T08:00:00");
    let mut entries = Vec::new();
    for monday in ["2024-01-29", "2024-02-05", "2024-02-12", "2024-02-19"] {
        entries.extend(week(monday, 3));
    }

    let met = compute_stats(&entries, &settings(), now);
    assert_eq!(met.this_month.weeks.len(), 4);
    assert!(met.this_month.all_weeks_met);
    assert_eq!(met.points.next_period_weekly_reward, 12);
    assert_eq!(met.points.total, 40);

    entries.retain(|e| e.date != day("2024-02-14"));
    let unmet = compute_stats(&entries, &settings(), now);
    assert!(!unmet.this_month.all_weeks_met);
    assert_eq!(unmet.points.next_period_weekly_reward, 10);
    assert_eq!(unmet.points.total, 30);
}

#[test]
fn test_week_ending_exactly_at_now_is_counted() {
    let entries = week("2024-03-04", 3);
    let before = compute_stats(&entries, &settings(), at("2024-03-10T23:59:59"));
    assert!(before.this_month.weeks.iter().all(|w| w.week_start != day("2024-03-04")));

    let end = NaiveDateTime::new(
        day("2024-03-10"),
        chrono::NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid time"),
    );
    let after = compute_stats(&entries, &settings(), end);
    assert!(after.this_month.weeks.iter().any(|w| w.week_start == day("2024-03-04")));
}

#[test]
fn test_interpersonal_unlock() {
    let now = at("2024-04-28T21:00:00");
    let mondays: Vec<NaiveDate> = (0..8).map(|w| day("2024-03-04") + Duration::days(7 * w)).collect();

    let mut entries = Vec::new();
    for (i, monday) in mondays.iter().enumerate() {
        let n = if i < 6 { 3 } else { 1 };
        entries.extend((0..n).map(|d| habit_day(*monday + Duration::days(d), "run")));
    }
    let six = compute_stats(&entries, &settings(), now);
    assert_eq!(six.interpersonal.met_weeks, 6);
    assert_eq!(six.interpersonal.total_weeks, 8);
    assert!(six.interpersonal.unlocked);

    entries.retain(|e| e.date != mondays[0]);
    let five = compute_stats(&entries, &settings(), now);
    assert_eq!(five.interpersonal.met_weeks, 5);
    assert_eq!(five.interpersonal.total_weeks, 8);
    assert!(!five.interpersonal.unlocked);
}

#[test]
fn test_empty_input() {
    let stats = compute_stats(&[], &Settings::default(), at("2024-03-13T10:00:00"));
    assert_eq!(stats.points.total, 0);
    assert_eq!(stats.points.qualifying_weeks, 0);
    assert_eq!(stats.this_month.entry_days, 0);
    assert_eq!(stats.this_month.met_weeks, 0);
    assert!(!stats.this_month.all_weeks_met);
    assert!(!stats.interpersonal.unlocked);
    assert_eq!(stats.projection.projected_month_end, 0);
}

#[test]
fn test_deleted_habit_still_counts_and_renders_unknown() {
    let entries = vec![
        habit_day(day("2024-03-04"), "deleted-id"),
        habit_day(day("2024-03-05"), "deleted-id"),
        habit_day(day("2024-03-06"), "deleted-id"),
    ];
    let settings = settings();
    let stats = compute_stats(&entries, &settings, at("2024-03-11T09:00:00"));
    assert_eq!(stats.points.total, 10);

    let rendered = entries[0].completed_habits(&settings);
    assert_eq!(rendered.len(), 1);
    assert!(matches!(rendered[0], HabitRef::Unknown(_)));
    assert_eq!(rendered[0].label(), UNKNOWN_HABIT_LABEL);
}
