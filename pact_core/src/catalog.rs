//! Default catalog of exercise definitions.
//!
//! This module provides the built-in exercises members can log.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog with the built-in exercises
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// Shorthand for a catalog entry
fn exercise(
    id: &str,
    name: &str,
    points_per_unit: f64,
    unit: ExerciseUnit,
    category: ExerciseCategory,
) -> ExerciseDefinition {
    ExerciseDefinition {
        id: id.into(),
        name: name.into(),
        points_per_unit,
        unit,
        is_weighted: false,
        supports_decreased_variant: false,
        category,
    }
}

fn build_default_catalog_internal() -> Catalog {
    use ExerciseCategory::*;
    use ExerciseUnit::*;

    let definitions = vec![
        // ====================================================================
        // Regular
        // ====================================================================
        ExerciseDefinition {
            supports_decreased_variant: true,
            ..exercise("pushups", "Push-ups", 1.0, Reps, Regular)
        },
        ExerciseDefinition {
            supports_decreased_variant: true,
            ..exercise("squats", "Squats", 0.5, Reps, Regular)
        },
        ExerciseDefinition {
            is_weighted: true,
            supports_decreased_variant: true,
            ..exercise("pullups", "Pull-ups", 3.0, Reps, Regular)
        },
        exercise("situps", "Sit-ups", 0.5, Reps, Regular),
        exercise("plank", "Plank", 0.5, Seconds, Regular),
        exercise("burpees", "Burpees", 2.0, Reps, Regular),
        ExerciseDefinition {
            is_weighted: true,
            ..exercise("weighted_squats", "Weighted Squats", 0.5, Reps, Regular)
        },
        ExerciseDefinition {
            is_weighted: true,
            ..exercise("lunges", "Lunges", 0.5, Reps, Regular)
        },
        ExerciseDefinition {
            is_weighted: true,
            supports_decreased_variant: true,
            ..exercise("dips", "Dips", 2.0, Reps, Regular)
        },
        // ====================================================================
        // Sport
        // ====================================================================
        exercise("running", "Running", 2.0, Minutes, Sport),
        exercise("cycling", "Cycling", 1.0, Minutes, Sport),
        exercise("swimming", "Swimming", 2.0, Minutes, Sport),
        // ====================================================================
        // Recovery
        // ====================================================================
        exercise("stretching", "Stretching", 1.0, Minutes, Recovery),
        exercise("yoga", "Yoga", 1.0, Minutes, Recovery),
        exercise("foam_rolling", "Foam Rolling", 0.5, Minutes, Recovery),
        exercise("walking", "Walking", 0.5, Minutes, Recovery),
    ];

    let exercises: HashMap<String, ExerciseDefinition> = definitions
        .into_iter()
        .map(|def| (def.id.clone(), def))
        .collect();

    Catalog { exercises }
}

impl Catalog {
    /// Look up an exercise by id
    pub fn get(&self, id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.get(id)
    }

    /// Look up an exercise by id, failing with `UnknownExercise`
    pub fn require(&self, id: &str) -> crate::Result<&ExerciseDefinition> {
        self.get(id)
            .ok_or_else(|| crate::Error::UnknownExercise(id.to_string()))
    }

    /// Exercises sorted by category then id, for stable listings
    pub fn sorted(&self) -> Vec<&ExerciseDefinition> {
        let mut all: Vec<_> = self.exercises.values().collect();
        all.sort_by_key(|def| (category_rank(def.category), def.id.clone()));
        all
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors (empty if valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (key, def) in &self.exercises {
            if def.id.is_empty() {
                errors.push(format!("Exercise under key '{}' has an empty id", key));
            } else if &def.id != key {
                errors.push(format!(
                    "Exercise '{}' stored under mismatched key '{}'",
                    def.id, key
                ));
            }

            if def.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has an empty name", key));
            }

            if !def.points_per_unit.is_finite() || def.points_per_unit <= 0.0 {
                errors.push(format!(
                    "Exercise '{}': points_per_unit {} must be positive",
                    key, def.points_per_unit
                ));
            }
        }

        let has_regular = self
            .exercises
            .values()
            .any(|d| d.category == ExerciseCategory::Regular);
        let has_recovery = self
            .exercises
            .values()
            .any(|d| d.category == ExerciseCategory::Recovery);

        if !has_regular {
            errors.push("Catalog has no regular exercises".to_string());
        }
        if !has_recovery {
            errors.push("Catalog has no recovery exercises".to_string());
        }

        errors
    }
}

fn category_rank(category: ExerciseCategory) -> u8 {
    match category {
        ExerciseCategory::Regular => 0,
        ExerciseCategory::Sport => 1,
        ExerciseCategory::Recovery => 2,
    }
}
