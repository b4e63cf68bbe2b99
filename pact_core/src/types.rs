//! Core domain types for the Pact commitment engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Member modes and group configuration
//! - Exercise definitions and their categories
//! - Log entries (frozen point values)
//! - Derived daily aggregates and streak summaries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Member Mode
// ============================================================================

/// Per-member difficulty setting
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Sane,
    Insane,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Sane => write!(f, "sane"),
            Mode::Insane => write!(f, "insane"),
        }
    }
}

impl FromStr for Mode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sane" => Ok(Mode::Sane),
            "insane" => Ok(Mode::Insane),
            other => Err(crate::Error::InvalidArgument(format!(
                "unknown mode '{}' (expected sane or insane)",
                other
            ))),
        }
    }
}

// ============================================================================
// Group Configuration
// ============================================================================

/// Weekday index, 0 = Sunday through 6 = Saturday
pub type Weekday = u8;

/// Per-group challenge configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConfig {
    /// Day 1 of the challenge
    pub start_date: NaiveDate,
    #[serde(default)]
    pub rest_days: BTreeSet<Weekday>,
    #[serde(default)]
    pub recovery_days: BTreeSet<Weekday>,
}

impl GroupConfig {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            rest_days: BTreeSet::new(),
            recovery_days: BTreeSet::new(),
        }
    }

    pub fn with_rest_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.rest_days = days.into_iter().collect();
        self
    }

    pub fn with_recovery_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.recovery_days = days.into_iter().collect();
        self
    }

    /// Reject weekday indices outside 0..=6
    pub fn validate(&self) -> crate::Result<()> {
        for day in self.rest_days.iter().chain(self.recovery_days.iter()) {
            if *day > 6 {
                return Err(crate::Error::InvalidArgument(format!(
                    "weekday index {} out of range 0-6",
                    day
                )));
            }
        }

        if !self.rest_days.is_disjoint(&self.recovery_days) {
            tracing::warn!(
                "Rest days {:?} overlap recovery days {:?}; rest takes precedence",
                self.rest_days,
                self.recovery_days
            );
        }

        Ok(())
    }

    pub fn is_rest_day(&self, weekday: Weekday) -> bool {
        self.rest_days.contains(&weekday)
    }

    /// Rest wins when a weekday is configured as both
    pub fn is_recovery_day(&self, weekday: Weekday) -> bool {
        !self.is_rest_day(weekday) && self.recovery_days.contains(&weekday)
    }

    /// Rest and recovery days neither extend nor break a streak
    pub fn is_excluded_from_streak(&self, weekday: Weekday) -> bool {
        self.rest_days.contains(&weekday) || self.recovery_days.contains(&weekday)
    }
}

// ============================================================================
// Exercise Types
// ============================================================================

/// What `quantity` measures for an exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseUnit {
    Reps,
    Seconds,
    Minutes,
}

impl fmt::Display for ExerciseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseUnit::Reps => write!(f, "reps"),
            ExerciseUnit::Seconds => write!(f, "sec"),
            ExerciseUnit::Minutes => write!(f, "min"),
        }
    }
}

/// Exercise classification; only `Recovery` is subject to the daily cap
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Regular,
    Recovery,
    Sport,
}

/// Immutable catalog entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    pub points_per_unit: f64,
    pub unit: ExerciseUnit,
    pub is_weighted: bool,
    pub supports_decreased_variant: bool,
    pub category: ExerciseCategory,
}

/// The complete catalog of exercise definitions
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseDefinition>,
}

// ============================================================================
// Log Types
// ============================================================================

/// One recorded activity; `computed_points` is frozen at logging time
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub exercise_id: String,
    pub category: ExerciseCategory,
    pub quantity: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub is_decreased: bool,
    pub computed_points: u32,
    #[serde(default)]
    pub logged_at: Option<DateTime<Utc>>,
}

impl LogEntry {
    /// Minimal entry carrying only what the analyzer reads
    pub fn points_only(date: NaiveDate, category: ExerciseCategory, points: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            exercise_id: String::new(),
            category,
            quantity: 0.0,
            weight: 0.0,
            is_decreased: false,
            computed_points: points,
            logged_at: None,
        }
    }
}

/// Per-date point totals, derived in memory and never persisted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    /// Regular and sport points (never capped)
    pub regular: u32,
    /// Raw recovery points per entry, in logging order
    pub recovery_entries: Vec<u32>,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            regular: 0,
            recovery_entries: Vec::new(),
        }
    }

    pub fn recovery_raw(&self) -> u32 {
        self.recovery_entries
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(*p))
    }

    pub fn raw_total(&self) -> u32 {
        self.regular.saturating_add(self.recovery_raw())
    }
}

/// Output of the streak analyzer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}
