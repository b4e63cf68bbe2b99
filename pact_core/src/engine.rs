//! Day status and entry recording for a single member.
//!
//! This module composes the target, scoring and streak rules into the two
//! questions a member asks while logging:
//! - Where do I stand today?
//! - What does this new entry earn me, and does it promote me?
//!
//! Everything here is pure: `today` comes from the caller, and persisting the
//! returned entry or the promoted mode is the caller's job.

use crate::scoring::score_entry;
use crate::streak::{aggregate_daily, effective_total, should_promote};
use crate::target::weekday_index;
use crate::{
    DailyAggregate, Error, ExerciseDefinition, GroupConfig, LogEntry, Mode, Result, TargetCurve,
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Snapshot of everything the engine needs about one member
#[derive(Clone, Debug)]
pub struct MemberContext {
    pub today: NaiveDate,
    pub mode: Mode,
    pub group: GroupConfig,
    pub history: Vec<LogEntry>,
}

/// Today's progress for a member
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyStatus {
    pub date: NaiveDate,
    pub mode: Mode,
    pub day_number: i64,
    /// Target under the member's own mode
    pub target: u32,
    pub insane_target: u32,
    pub regular_points: u32,
    pub recovery_points_raw: u32,
    /// Regular points plus capped recovery points
    pub effective_total: u32,
    pub remaining: u32,
    pub is_rest_day: bool,
    pub is_recovery_day: bool,
    pub target_met: bool,
}

/// Result of scoring and recording one exercise
#[derive(Clone, Debug)]
pub struct RecordOutcome {
    /// Entry to persist, points frozen
    pub entry: LogEntry,
    pub status: DailyStatus,
    /// Caller should persist `Mode::Insane` for this member
    pub promoted: bool,
}

/// Compute today's status for a member
pub fn daily_status(ctx: &MemberContext, curve: &TargetCurve) -> Result<DailyStatus> {
    ctx.group.validate()?;

    let date = ctx.today;
    let weekday = weekday_index(date);
    let is_rest_day = ctx.group.is_rest_day(weekday);
    let is_recovery_day = ctx.group.is_recovery_day(weekday);

    let target = ctx.group.target_on(date, ctx.mode, curve)?;
    let insane_target = ctx.group.target_on(date, Mode::Insane, curve)?;

    let days = aggregate_daily(&ctx.history);
    let today = days
        .get(&date)
        .cloned()
        .unwrap_or_else(|| DailyAggregate::new(date));

    let total = effective_total(&today, target, is_recovery_day);

    Ok(DailyStatus {
        date,
        mode: ctx.mode,
        day_number: crate::target::days_since_start(ctx.group.start_date, date),
        target,
        insane_target,
        regular_points: today.regular,
        recovery_points_raw: today.recovery_raw(),
        effective_total: total,
        remaining: target.saturating_sub(total),
        is_rest_day,
        is_recovery_day,
        target_met: total >= target,
    })
}

/// Score a new entry dated `ctx.today` and check for promotion
///
/// Fails with `InvalidArgument` for a non-positive quantity, which must
/// never be persisted.
pub fn record_entry(
    ctx: &MemberContext,
    curve: &TargetCurve,
    exercise: &ExerciseDefinition,
    quantity: f64,
    weight: f64,
    is_decreased: bool,
    logged_at: Option<DateTime<Utc>>,
) -> Result<RecordOutcome> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }

    let points = score_entry(exercise, quantity, weight, is_decreased);
    let entry = LogEntry {
        id: Uuid::new_v4(),
        date: ctx.today,
        exercise_id: exercise.id.clone(),
        category: exercise.category,
        quantity,
        weight: if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        },
        is_decreased: is_decreased && exercise.supports_decreased_variant,
        computed_points: points,
        logged_at,
    };

    tracing::info!(
        "Scored {} x {} {} for {} points",
        quantity,
        exercise.name,
        exercise.unit,
        points
    );

    let mut updated = ctx.clone();
    updated.history.push(entry.clone());
    let status = daily_status(&updated, curve)?;

    // Promotion is judged against the insane target and its own recovery cap
    let days = aggregate_daily(&updated.history);
    let insane_total = days
        .get(&ctx.today)
        .map(|day| effective_total(day, status.insane_target, status.is_recovery_day))
        .unwrap_or(0);
    let promoted = should_promote(insane_total, status.insane_target, ctx.mode);

    if promoted {
        tracing::info!(
            "Member reached insane target {} on {}, promoting",
            status.insane_target,
            ctx.today
        );
    }

    Ok(RecordOutcome {
        entry,
        status,
        promoted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_default_catalog;
    use crate::ExerciseCategory;

    // 2024-03-04 is a Monday
    fn context(mode: Mode) -> MemberContext {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        MemberContext {
            today: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            mode,
            group: GroupConfig::new(start)
                .with_rest_days([0])
                .with_recovery_days([5]),
            history: vec![],
        }
    }

    #[test]
    fn test_status_with_no_history() {
        let ctx = context(Mode::Sane);
        let status = daily_status(&ctx, &TargetCurve::default()).unwrap();

        assert_eq!(status.day_number, 3);
        assert_eq!(status.target, 52);
        assert_eq!(status.insane_target, 104);
        assert_eq!(status.effective_total, 0);
        assert_eq!(status.remaining, 52);
        assert!(!status.target_met);
        assert!(!status.is_rest_day);
        assert!(!status.is_recovery_day);
    }

    #[test]
    fn test_status_caps_recovery() {
        let mut ctx = context(Mode::Sane);
        ctx.history = vec![
            LogEntry::points_only(ctx.today, ExerciseCategory::Regular, 30),
            LogEntry::points_only(ctx.today, ExerciseCategory::Recovery, 40),
        ];

        let status = daily_status(&ctx, &TargetCurve::default()).unwrap();
        assert_eq!(status.regular_points, 30);
        assert_eq!(status.recovery_points_raw, 40);
        // cap = 52 / 4 = 13
        assert_eq!(status.effective_total, 43);
        assert_eq!(status.remaining, 9);
    }

    #[test]
    fn test_recovery_day_uncapped() {
        let mut ctx = context(Mode::Sane);
        ctx.today = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(); // Friday
        ctx.history = vec![LogEntry::points_only(
            ctx.today,
            ExerciseCategory::Recovery,
            40,
        )];

        let status = daily_status(&ctx, &TargetCurve::default()).unwrap();
        assert!(status.is_recovery_day);
        assert_eq!(status.target, 54 / 4);
        assert_eq!(status.effective_total, 40);
        assert!(status.target_met);
    }

    #[test]
    fn test_rest_day_status() {
        let mut ctx = context(Mode::Insane);
        ctx.today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(); // Sunday

        let status = daily_status(&ctx, &TargetCurve::default()).unwrap();
        assert!(status.is_rest_day);
        assert_eq!(status.target, 0);
        assert!(status.target_met);
    }

    #[test]
    fn test_record_entry_scores_and_dates() {
        crate::logging::init_test();
        let catalog = build_default_catalog();
        let pushups = catalog.get("pushups").unwrap();
        let ctx = context(Mode::Sane);

        let outcome =
            record_entry(&ctx, &TargetCurve::default(), pushups, 20.0, 0.0, false, None).unwrap();

        assert_eq!(outcome.entry.date, ctx.today);
        assert_eq!(outcome.entry.exercise_id, "pushups");
        assert_eq!(outcome.entry.computed_points, 20);
        assert_eq!(outcome.status.effective_total, 20);
        assert!(!outcome.promoted);
    }

    #[test]
    fn test_record_entry_rejects_non_positive_quantity() {
        let catalog = build_default_catalog();
        let pushups = catalog.get("pushups").unwrap();
        let ctx = context(Mode::Sane);

        let result = record_entry(&ctx, &TargetCurve::default(), pushups, 0.0, 0.0, false, None);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_record_entry_promotes_sane_member() {
        let catalog = build_default_catalog();
        let pushups = catalog.get("pushups").unwrap();
        let mut ctx = context(Mode::Sane);
        ctx.history = vec![LogEntry::points_only(
            ctx.today,
            ExerciseCategory::Regular,
            90,
        )];

        // 90 + 14 = 104, the insane target on day 3
        let outcome =
            record_entry(&ctx, &TargetCurve::default(), pushups, 14.0, 0.0, false, None).unwrap();
        assert!(outcome.promoted);
        assert!(outcome.status.target_met);
    }

    #[test]
    fn test_insane_member_never_promoted() {
        let catalog = build_default_catalog();
        let pushups = catalog.get("pushups").unwrap();
        let ctx = context(Mode::Insane);

        let outcome =
            record_entry(&ctx, &TargetCurve::default(), pushups, 500.0, 0.0, false, None)
                .unwrap();
        assert!(!outcome.promoted);
    }

    #[test]
    fn test_decreased_flag_dropped_when_unsupported() {
        let catalog = build_default_catalog();
        let plank = catalog.get("plank").unwrap();
        let ctx = context(Mode::Sane);

        let outcome =
            record_entry(&ctx, &TargetCurve::default(), plank, 60.0, 0.0, true, None).unwrap();
        assert!(!outcome.entry.is_decreased);
    }
}
