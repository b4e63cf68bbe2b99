//! Point scoring for logged exercises.
//!
//! Scoring rules:
//! - Base score is quantity times the exercise's points per unit
//! - Weighted exercises get a stepped multiplier (5-unit bands from 10 up)
//! - The decreased variant earns a 1.5x bonus
//! - Scores round up, so any positive effort earns at least a point
//!
//! Recovery-category points are capped separately per day, see
//! [`effective_recovery_points`].

use crate::ExerciseDefinition;

/// Weight below which no multiplier applies
const WEIGHT_BAND_START: f64 = 10.0;

/// Width of each weight band
const WEIGHT_BAND_WIDTH: f64 = 5.0;

/// Multiplier added per weight band
const WEIGHT_BAND_STEP: f64 = 0.5;

const DECREASED_BONUS: f64 = 1.5;

/// Absorbs float noise such as `10.0 * 1.1 == 11.000000000000002`
const ROUNDING_EPSILON: f64 = 1e-9;

/// Share of the daily target that recovery points may fill on other days
const RECOVERY_CAP_DIVISOR: u32 = 4;

/// Stepped multiplier for a given weight
///
/// 1.0 below 10, then 1.5 for [10, 15), 2.0 for [15, 20), and so on.
pub fn weight_multiplier(weight: f64) -> f64 {
    if !weight.is_finite() || weight < WEIGHT_BAND_START {
        return 1.0;
    }

    let bands = ((weight - WEIGHT_BAND_START) / WEIGHT_BAND_WIDTH).floor() + 1.0;
    1.0 + bands * WEIGHT_BAND_STEP
}

/// Weight-adjusted score before the decreased bonus and rounding
pub fn score_entry_raw(exercise: &ExerciseDefinition, quantity: f64, weight: f64) -> f64 {
    if !quantity.is_finite() || quantity <= 0.0 {
        return 0.0;
    }

    let base = quantity * exercise.points_per_unit;
    if exercise.is_weighted && weight > 0.0 {
        base * weight_multiplier(weight)
    } else {
        base
    }
}

/// Score a single entry, rounded up to a whole point
///
/// A missing weight on a weighted exercise is bodyweight (pass 0).
pub fn score_entry(
    exercise: &ExerciseDefinition,
    quantity: f64,
    weight: f64,
    is_decreased: bool,
) -> u32 {
    let mut score = score_entry_raw(exercise, quantity, weight);
    if score <= 0.0 || !score.is_finite() {
        return 0;
    }

    if is_decreased && exercise.supports_decreased_variant {
        score *= DECREASED_BONUS;
    } else if is_decreased {
        tracing::debug!(
            "Exercise {} has no decreased variant, bonus ignored",
            exercise.id
        );
    }

    round_up(score)
}

fn round_up(score: f64) -> u32 {
    let rounded = (score - ROUNDING_EPSILON).ceil().max(0.0);
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Cap on a day's recovery points when it is not a recovery day
pub fn recovery_cap(daily_target: u32) -> u32 {
    daily_target / RECOVERY_CAP_DIVISOR
}

/// Effective contribution of each of today's recovery entries
///
/// On a recovery day every entry counts in full. Otherwise, if the raw sum
/// exceeds a quarter of the target, each entry shrinks in proportion to its
/// raw size (floored) so the total stays within the cap.
pub fn effective_recovery_points(
    raw_scores: &[u32],
    daily_target: u32,
    is_recovery_day: bool,
) -> Vec<u32> {
    if is_recovery_day {
        return raw_scores.to_vec();
    }

    let raw_sum: u64 = raw_scores.iter().map(|p| u64::from(*p)).sum();
    let cap = u64::from(recovery_cap(daily_target));

    if raw_sum == 0 || raw_sum <= cap {
        return raw_scores.to_vec();
    }

    tracing::debug!(
        "Recovery points {} exceed cap {}, scaling entries down",
        raw_sum,
        cap
    );

    raw_scores
        .iter()
        .map(|raw| (u64::from(*raw) * cap / raw_sum) as u32)
        .collect()
}
