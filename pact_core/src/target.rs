//! Daily target calculation.
//!
//! The required point total for a day ramps up linearly with the number of
//! days since the group started:
//! - Rest days require nothing
//! - Recovery days require a quarter of the full target
//! - `insane` mode uses a higher base and a steeper ramp than `sane`

use crate::{Error, GroupConfig, Mode, Result, Weekday};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ramp parameters for one mode
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurveParams {
    /// Target on day 1
    pub base: u32,
    /// Points added per elapsed day
    pub daily_increment: u32,
}

/// Tuning constants for both modes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetCurve {
    #[serde(default = "default_sane_curve")]
    pub sane: CurveParams,

    #[serde(default = "default_insane_curve")]
    pub insane: CurveParams,
}

impl Default for TargetCurve {
    fn default() -> Self {
        Self {
            sane: default_sane_curve(),
            insane: default_insane_curve(),
        }
    }
}

fn default_sane_curve() -> CurveParams {
    CurveParams {
        base: 50,
        daily_increment: 1,
    }
}

fn default_insane_curve() -> CurveParams {
    CurveParams {
        base: 100,
        daily_increment: 2,
    }
}

impl TargetCurve {
    pub fn params(&self, mode: Mode) -> CurveParams {
        match mode {
            Mode::Sane => self.sane,
            Mode::Insane => self.insane,
        }
    }

    /// `insane` must never ask for less than `sane` on any day
    pub fn validate(&self) -> Result<()> {
        if self.insane.base < self.sane.base {
            return Err(Error::Config(format!(
                "insane base {} is below sane base {}",
                self.insane.base, self.sane.base
            )));
        }
        if self.insane.daily_increment < self.sane.daily_increment {
            return Err(Error::Config(format!(
                "insane daily_increment {} is below sane daily_increment {}",
                self.insane.daily_increment, self.sane.daily_increment
            )));
        }
        Ok(())
    }

    /// Target with no rest/recovery adjustment
    pub fn full_target(&self, day_number: u64, mode: Mode) -> u32 {
        let params = self.params(mode);
        let elapsed = day_number.saturating_sub(1);
        let ramp = elapsed.saturating_mul(u64::from(params.daily_increment));
        let target = u64::from(params.base).saturating_add(ramp);
        u32::try_from(target).unwrap_or(u32::MAX)
    }
}

/// Compute the number of points required on a given day
///
/// `days_since_start` is 1 on the start date; 0 is treated as day 1.
/// Rest days win over recovery days when a weekday is configured as both.
pub fn compute_daily_target(
    days_since_start: i64,
    mode: Mode,
    rest_days: &BTreeSet<Weekday>,
    recovery_days: &BTreeSet<Weekday>,
    day_of_week: Weekday,
    curve: &TargetCurve,
) -> Result<u32> {
    if day_of_week > 6 {
        return Err(Error::InvalidArgument(format!(
            "day_of_week {} out of range 0-6",
            day_of_week
        )));
    }
    if days_since_start < 0 {
        return Err(Error::InvalidArgument(format!(
            "days_since_start {} is negative",
            days_since_start
        )));
    }

    if rest_days.contains(&day_of_week) {
        return Ok(0);
    }

    let day_number = days_since_start.max(1) as u64;
    let full = curve.full_target(day_number, mode);

    if recovery_days.contains(&day_of_week) {
        Ok(full / 4)
    } else {
        Ok(full)
    }
}

/// Day number of `date` within a challenge starting on `start`, clamped to 1
pub fn days_since_start(start: NaiveDate, date: NaiveDate) -> i64 {
    ((date - start).num_days() + 1).max(1)
}

/// Weekday index with Sunday as 0
pub fn weekday_index(date: NaiveDate) -> Weekday {
    date.weekday().num_days_from_sunday() as Weekday
}

impl GroupConfig {
    /// Target for a calendar date under this group's configuration
    pub fn target_on(&self, date: NaiveDate, mode: Mode, curve: &TargetCurve) -> Result<u32> {
        compute_daily_target(
            days_since_start(self.start_date, date),
            mode,
            &self.rest_days,
            &self.recovery_days,
            weekday_index(date),
            curve,
        )
    }
}
