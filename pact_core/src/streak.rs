//! Streak measurement and automatic mode promotion.
//!
//! A streak counts consecutive qualifying days on which the member's points
//! met the `insane` target:
//! - Rest and recovery weekdays are neutral (skipped, never break a streak)
//! - A calendar day without any log counts as zero points
//! - Today is still in progress, so falling short of it does not break an
//!   active streak; meeting it extends the streak

use crate::scoring::effective_recovery_points;
use crate::target::weekday_index;
use crate::{
    DailyAggregate, ExerciseCategory, GroupConfig, LogEntry, Mode, Result, StreakSummary,
    TargetCurve,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Outcome of checking one calendar day against its target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayOutcome {
    /// Rest or recovery weekday
    Neutral,
    Met,
    Missed,
}

/// Group log entries into per-date subtotals
///
/// Sport points are folded into the regular subtotal since they are never capped.
pub fn aggregate_daily(history: &[LogEntry]) -> BTreeMap<NaiveDate, DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, DailyAggregate> = BTreeMap::new();

    for entry in history {
        let day = days
            .entry(entry.date)
            .or_insert_with(|| DailyAggregate::new(entry.date));

        match entry.category {
            ExerciseCategory::Recovery => day.recovery_entries.push(entry.computed_points),
            ExerciseCategory::Regular | ExerciseCategory::Sport => {
                day.regular = day.regular.saturating_add(entry.computed_points);
            }
        }
    }

    days
}

/// Points a day contributes toward `daily_target` once recovery capping applies
pub fn effective_total(day: &DailyAggregate, daily_target: u32, is_recovery_day: bool) -> u32 {
    effective_recovery_points(&day.recovery_entries, daily_target, is_recovery_day)
        .into_iter()
        .fold(day.regular, |acc, p| acc.saturating_add(p))
}

/// Check a single date against the target for `mode`
pub fn evaluate_day(
    days: &BTreeMap<NaiveDate, DailyAggregate>,
    date: NaiveDate,
    group: &GroupConfig,
    mode: Mode,
    curve: &TargetCurve,
) -> Result<DayOutcome> {
    let weekday = weekday_index(date);
    if group.is_excluded_from_streak(weekday) {
        return Ok(DayOutcome::Neutral);
    }

    let target = group.target_on(date, mode, curve)?;
    let total = days
        .get(&date)
        .map(|day| effective_total(day, target, false))
        .unwrap_or(0);

    if total >= target {
        Ok(DayOutcome::Met)
    } else {
        Ok(DayOutcome::Missed)
    }
}

/// Compute current and longest streaks against the target for `mode`
///
/// Entries dated before the group start or after `today` are ignored.
pub fn compute_streak(
    history: &[LogEntry],
    group: &GroupConfig,
    today: NaiveDate,
    mode: Mode,
    curve: &TargetCurve,
) -> Result<StreakSummary> {
    group.validate()?;

    let days: BTreeMap<NaiveDate, DailyAggregate> = aggregate_daily(history)
        .into_iter()
        .filter(|(date, _)| *date >= group.start_date && *date <= today)
        .collect();

    let Some(anchor) = find_anchor(&days, group, today) else {
        tracing::debug!("No qualifying history, streak is empty");
        return Ok(StreakSummary::default());
    };

    let current = walk_current(&days, group, anchor, today, mode, curve)?;
    let longest = walk_longest(&days, group, anchor, mode, curve)?;

    tracing::debug!(
        "Streak for {} mode ending {}: current {}, longest {}",
        mode,
        anchor,
        current,
        longest
    );

    Ok(StreakSummary { current, longest })
}

/// Streak against the `insane` target, the usual way streaks are reported
pub fn compute_insane_streak(
    history: &[LogEntry],
    group: &GroupConfig,
    today: NaiveDate,
    curve: &TargetCurve,
) -> Result<StreakSummary> {
    compute_streak(history, group, today, Mode::Insane, curve)
}

/// Most recent date a streak can end on
///
/// Skips neutral weekdays (so a zero-point log on a rest day changes nothing)
/// and today while nothing has been earned yet.
fn find_anchor(
    days: &BTreeMap<NaiveDate, DailyAggregate>,
    group: &GroupConfig,
    today: NaiveDate,
) -> Option<NaiveDate> {
    days.iter()
        .rev()
        .filter(|(date, _)| !group.is_excluded_from_streak(weekday_index(**date)))
        .find(|(date, day)| !(**date == today && day.raw_total() == 0))
        .map(|(date, _)| *date)
}

fn walk_current(
    days: &BTreeMap<NaiveDate, DailyAggregate>,
    group: &GroupConfig,
    anchor: NaiveDate,
    today: NaiveDate,
    mode: Mode,
    curve: &TargetCurve,
) -> Result<u32> {
    let mut current = 0;
    let mut date = anchor;

    while date >= group.start_date {
        match evaluate_day(days, date, group, mode, curve)? {
            DayOutcome::Neutral => {}
            DayOutcome::Met => current += 1,
            // today can still be met
            DayOutcome::Missed if date == today => {}
            DayOutcome::Missed => break,
        }

        match date.pred_opt() {
            Some(previous) => date = previous,
            None => break,
        }
    }

    Ok(current)
}

fn walk_longest(
    days: &BTreeMap<NaiveDate, DailyAggregate>,
    group: &GroupConfig,
    anchor: NaiveDate,
    mode: Mode,
    curve: &TargetCurve,
) -> Result<u32> {
    let mut longest = 0;
    let mut running = 0;

    for date in group.start_date.iter_days().take_while(|d| *d <= anchor) {
        match evaluate_day(days, date, group, mode, curve)? {
            DayOutcome::Neutral => {}
            DayOutcome::Met => {
                running += 1;
                longest = longest.max(running);
            }
            DayOutcome::Missed => running = 0,
        }
    }

    Ok(longest)
}

/// Whether a `sane` member has earned promotion to `insane`
///
/// One-way: an `insane` member is never promoted or demoted here. A day
/// without an `insane` requirement (rest day) proves nothing.
pub fn should_promote(today_total: u32, today_insane_target: u32, current_mode: Mode) -> bool {
    current_mode == Mode::Sane && today_insane_target > 0 && today_total >= today_insane_target
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    // 2024-03-04 is a Monday
    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn day(n: i64) -> NaiveDate {
        start() + Duration::days(n - 1)
    }

    fn insane_target(n: i64) -> u32 {
        TargetCurve::default().full_target(n as u64, Mode::Insane)
    }

    fn regular(n: i64, points: u32) -> LogEntry {
        LogEntry::points_only(day(n), ExerciseCategory::Regular, points)
    }

    fn streak(history: &[LogEntry], group: &GroupConfig, today: i64) -> StreakSummary {
        compute_insane_streak(history, group, day(today), &TargetCurve::default()).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let group = GroupConfig::new(start());
        assert_eq!(streak(&[], &group, 5), StreakSummary::default());
    }

    #[test]
    fn test_aggregate_partitions_categories() {
        let history = vec![
            regular(1, 40),
            LogEntry::points_only(day(1), ExerciseCategory::Sport, 15),
            LogEntry::points_only(day(1), ExerciseCategory::Recovery, 30),
            LogEntry::points_only(day(1), ExerciseCategory::Recovery, 10),
            regular(2, 5),
        ];

        let days = aggregate_daily(&history);
        assert_eq!(days.len(), 2);

        let first = &days[&day(1)];
        assert_eq!(first.regular, 55);
        assert_eq!(first.recovery_entries, vec![30, 10]);
        assert_eq!(first.raw_total(), 95);
        assert_eq!(days[&day(2)].raw_total(), 5);
    }

    #[test]
    fn test_effective_total_caps_recovery() {
        let mut agg = DailyAggregate::new(day(1));
        agg.regular = 60;
        agg.recovery_entries = vec![30, 10];

        // cap 25 of 40 raw: 30 -> 18, 10 -> 6
        assert_eq!(effective_total(&agg, 100, false), 84);
        assert_eq!(effective_total(&agg, 100, true), 100);
    }

    #[test]
    fn test_run_broken_by_miss() {
        // Days 1-5 met, 6 missed, 7-12 met, nothing logged 13-14
        let group = GroupConfig::new(start());
        let mut history = Vec::new();
        for n in 1..=12 {
            if n == 6 {
                history.push(regular(n, 10));
            } else {
                history.push(regular(n, insane_target(n)));
            }
        }

        let summary = streak(&history, &group, 14);
        assert_eq!(summary.current, 6);
        assert_eq!(summary.longest, 6);
    }

    #[test]
    fn test_longest_keeps_earlier_run() {
        let group = GroupConfig::new(start());
        let mut history: Vec<_> = (1..=8).map(|n| regular(n, insane_target(n))).collect();
        history.push(regular(10, insane_target(10)));

        let summary = streak(&history, &group, 10);
        assert_eq!(summary.current, 1);
        assert_eq!(summary.longest, 8);
    }

    #[test]
    fn test_gap_day_counts_as_miss() {
        let group = GroupConfig::new(start());
        let history = vec![
            regular(1, insane_target(1)),
            regular(2, insane_target(2)),
            regular(4, insane_target(4)),
        ];

        let summary = streak(&history, &group, 4);
        assert_eq!(summary.current, 1);
        assert_eq!(summary.longest, 2);
    }

    #[test]
    fn test_sane_target_not_enough() {
        let group = GroupConfig::new(start());
        let curve = TargetCurve::default();
        let history: Vec<_> = (1..=3)
            .map(|n| regular(n, curve.full_target(n as u64, Mode::Sane)))
            .collect();

        assert_eq!(streak(&history, &group, 3), StreakSummary::default());

        let sane = compute_streak(&history, &group, day(3), Mode::Sane, &curve).unwrap();
        assert_eq!(sane.current, 3);
    }

    #[test]
    fn test_rest_and_recovery_days_are_neutral() {
        // Rest on Wednesday (day 3), recovery on Thursday (day 4)
        let group = GroupConfig::new(start())
            .with_rest_days([3])
            .with_recovery_days([4]);
        let history = vec![
            regular(1, insane_target(1)),
            regular(2, insane_target(2)),
            regular(5, insane_target(5)),
        ];

        let summary = streak(&history, &group, 5);
        assert_eq!(summary.current, 3);
        assert_eq!(summary.longest, 3);
    }

    #[test]
    fn test_zero_log_on_rest_day_changes_nothing() {
        let group = GroupConfig::new(start()).with_rest_days([0]);
        let mut history: Vec<_> = (1..=5).map(|n| regular(n, insane_target(n))).collect();
        let without = streak(&history, &group, 9);

        // Day 7 is Sunday
        history.push(regular(7, 0));
        let with = streak(&history, &group, 9);

        assert_eq!(without, with);
        assert_eq!(with.current, 5);
    }

    #[test]
    fn test_today_without_points_keeps_streak() {
        let group = GroupConfig::new(start());
        let mut history: Vec<_> = (1..=4).map(|n| regular(n, insane_target(n))).collect();
        history.push(regular(5, 0));

        let summary = streak(&history, &group, 5);
        assert_eq!(summary.current, 4);
    }

    #[test]
    fn test_today_partial_points_keeps_streak() {
        let group = GroupConfig::new(start());
        let mut history: Vec<_> = (1..=4).map(|n| regular(n, insane_target(n))).collect();
        history.push(regular(5, 1));

        let summary = streak(&history, &group, 5);
        assert_eq!(summary.current, 4);
        assert_eq!(summary.longest, 4);

        // Once today is met it extends the run
        history.push(regular(5, insane_target(5)));
        let summary = streak(&history, &group, 5);
        assert_eq!(summary.current, 5);
        assert_eq!(summary.longest, 5);
    }

    #[test]
    fn test_short_day_before_today_still_breaks_streak() {
        let group = GroupConfig::new(start());
        let mut history: Vec<_> = (1..=4).map(|n| regular(n, insane_target(n))).collect();
        history.push(regular(5, 1));

        // Day 5 is over once today is day 6
        let summary = streak(&history, &group, 6);
        assert_eq!(summary.current, 0);
        assert_eq!(summary.longest, 4);
    }

    #[test]
    fn test_entries_outside_window_ignored() {
        let group = GroupConfig::new(start());
        let history = vec![
            LogEntry::points_only(start() - Duration::days(1), ExerciseCategory::Regular, 999),
            regular(1, insane_target(1)),
            regular(3, 999),
        ];

        let summary = streak(&history, &group, 2);
        assert_eq!(summary.current, 1);
        assert_eq!(summary.longest, 1);
    }

    #[test]
    fn test_recovery_points_capped_in_streak() {
        let group = GroupConfig::new(start());
        let target = insane_target(1);
        let history = vec![
            regular(1, target / 2),
            LogEntry::points_only(day(1), ExerciseCategory::Recovery, target),
        ];

        // Half the target from regular plus at most a quarter from recovery
        assert_eq!(streak(&history, &group, 1).current, 0);
    }

    #[test]
    fn test_invalid_group_rejected() {
        let group = GroupConfig::new(start()).with_rest_days([9]);
        let result =
            compute_insane_streak(&[regular(1, 1)], &group, day(1), &TargetCurve::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_should_promote() {
        assert!(should_promote(120, 120, Mode::Sane));
        assert!(should_promote(200, 120, Mode::Sane));
        assert!(!should_promote(119, 120, Mode::Sane));
        assert!(!should_promote(500, 120, Mode::Insane));
        assert!(!should_promote(0, 0, Mode::Sane));
    }

    #[test]
    fn test_promotion_scenario() {
        // Sane member, rest Monday, recovery Friday; nothing earned until day 10
        let group = GroupConfig::new(start())
            .with_rest_days([1])
            .with_recovery_days([5]);
        let curve = TargetCurve::default();

        for n in 1..=10 {
            let date = day(n);
            let insane = group.target_on(date, Mode::Insane, &curve).unwrap();
            let total = if n == 10 { insane } else { 0 };
            assert_eq!(
                should_promote(total, insane, Mode::Sane),
                n == 10,
                "day {}",
                n
            );
        }
    }
}
