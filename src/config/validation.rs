//! Workout document validation
//!
//! Validation runs on the deserialized [`WorkoutDocument`] and collects ALL
//! errors (doesn't stop at first) so a user fixing a file sees every
//! problem in one pass.

use crate::config::loader::ConfigLimits;
use crate::config::schema::{DurationValue, WorkoutDocument};
use crate::error::{Severity, ValidationIssue};
use crate::workout::{TimingConfig, TimingSpec};

/// Sessions longer than this draw a warning.
pub const LONG_SESSION_SEC: u64 = 24 * 60 * 60;

// ============================================================================
// Public API
// ============================================================================

/// Result of workout validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Workout document validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a workout document and returns every issue found.
    pub fn validate(&mut self, doc: &WorkoutDocument, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_metadata(doc);
        if let Some(spec) = self.validate_timing(doc) {
            self.validate_schedule(&spec, limits);
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    fn validate_metadata(&mut self, doc: &WorkoutDocument) {
        if doc.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            self.add_error("workout.id", "Workout id cannot be blank when present");
        }

        if doc.title.trim().is_empty() {
            self.add_error("workout.title", "Workout title is required and cannot be empty");
        }

        if let Some(exercise) = &doc.exercise {
            if exercise.name.trim().is_empty() {
                self.add_error(
                    "workout.exercise.name",
                    "Exercise name cannot be empty; omit the exercise block instead",
                );
            }
        }
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// Resolves every timing field, recording an error for each bad one.
    ///
    /// Returns the resolved spec only when all fields were usable.
    fn validate_timing(&mut self, doc: &WorkoutDocument) -> Option<TimingSpec> {
        let t = &doc.timing;

        let warmup = self.optional_duration("workout.timing.warmup", t.warmup.as_ref());
        let rest_reps =
            self.optional_duration("workout.timing.rest_between_reps", t.rest_between_reps.as_ref());
        let rest_sets =
            self.optional_duration("workout.timing.rest_between_sets", t.rest_between_sets.as_ref());
        let cooldown = self.optional_duration("workout.timing.cooldown", t.cooldown.as_ref());

        let work = match &t.work {
            None => {
                self.add_error("workout.timing.work", "Work duration is required");
                None
            }
            Some(value) => match value.seconds() {
                None => {
                    self.invalid_duration("workout.timing.work", value);
                    None
                }
                Some(0) => {
                    self.add_error("workout.timing.work", "Work duration must be greater than 0");
                    None
                }
                Some(s) => Some(s),
            },
        };

        let reps = match t.reps_per_set.unwrap_or(1) {
            0 => {
                self.add_error(
                    "workout.timing.reps_per_set",
                    "Reps per set must be greater than 0",
                );
                None
            }
            n => Some(n),
        };

        let sets = match t.sets {
            None => {
                self.add_error("workout.timing.sets", "Number of sets is required");
                None
            }
            Some(0) => {
                self.add_error("workout.timing.sets", "Number of sets must be greater than 0");
                None
            }
            Some(n) => Some(n),
        };

        Some(TimingSpec {
            warmup_sec: warmup?,
            work_sec: work?,
            rest_between_reps_sec: rest_reps?,
            reps_per_set: reps?,
            rest_between_sets_sec: rest_sets?,
            sets: sets?,
            cooldown_sec: cooldown?,
        })
    }

    fn optional_duration(&mut self, path: &str, value: Option<&DurationValue>) -> Option<u32> {
        match value {
            None => Some(0),
            Some(v) => {
                let seconds = v.seconds();
                if seconds.is_none() {
                    self.invalid_duration(path, v);
                }
                seconds
            }
        }
    }

    fn invalid_duration(&mut self, path: &str, value: &DurationValue) {
        self.add_error(
            path,
            &format!("Invalid duration '{value}' (expected seconds, MM:SS or H:MM:SS)"),
        );
    }

    // ========================================================================
    // Schedule
    // ========================================================================

    /// Checks the expanded shape of a fully resolved timing spec.
    fn validate_schedule(&mut self, spec: &TimingSpec, limits: &ConfigLimits) {
        let Ok(timing) = TimingConfig::new(*spec) else {
            return;
        };

        if let Err(phases) = timing.check_phase_limit(limits.max_phases) {
            self.add_error(
                "workout.timing",
                &format!(
                    "Workout expands to {phases} phases, exceeding the limit of {}",
                    limits.max_phases
                ),
            );
        }

        if timing.rest_between_reps_sec() > 0 && timing.reps_per_set() == 1 {
            self.add_warning(
                "workout.timing.rest_between_reps",
                "Rest between reps has no effect with one rep per set",
            );
        }

        if timing.rest_between_sets_sec() > 0 && timing.sets() == 1 {
            self.add_warning(
                "workout.timing.rest_between_sets",
                "Rest between sets has no effect with a single set",
            );
        }

        match timing.total_duration_sec() {
            None => self.add_error(
                "workout.timing",
                "Total session length is too large to represent",
            ),
            Some(total) if total > LONG_SESSION_SEC => self.add_warning(
                "workout.timing",
                &format!("Session lasts {total} seconds, longer than 24 hours"),
            ),
            Some(_) => {}
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
