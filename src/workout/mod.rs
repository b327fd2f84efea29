//! Workout definitions
//!
//! The user-authored template a session is generated from: timing
//! parameters, an optional exercise, and identifying metadata. All three
//! value types enforce their invariants at construction, so everything
//! downstream (phase expansion, the session engine) can assume validity.

pub mod draft;
pub mod duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use draft::{WorkoutDraft, suggest_exercise};
pub use duration::{format_duration, parse_count, parse_duration};

// ============================================================================
// Timing
// ============================================================================

/// Unvalidated timing parameters, in whole seconds.
///
/// This is the wire/document shape; convert with
/// [`TimingConfig::new`] (or `TryFrom`) to obtain a validated value.
/// Defaults mirror an empty editor form: no warmup, rests or cooldown and
/// one rep per set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingSpec {
    /// Warmup before the first set (0 = none)
    #[serde(default)]
    pub warmup_sec: u32,
    /// Duration of each work interval
    pub work_sec: u32,
    /// Rest between reps inside a set (0 = none)
    #[serde(default)]
    pub rest_between_reps_sec: u32,
    /// Reps per set
    #[serde(default = "default_reps_per_set")]
    pub reps_per_set: u32,
    /// Rest between sets (0 = none)
    #[serde(default)]
    pub rest_between_sets_sec: u32,
    /// Number of sets
    pub sets: u32,
    /// Cooldown after the last set (0 = none)
    #[serde(default)]
    pub cooldown_sec: u32,
}

const fn default_reps_per_set() -> u32 {
    1
}

impl Default for TimingSpec {
    fn default() -> Self {
        Self {
            warmup_sec: 0,
            work_sec: 0,
            rest_between_reps_sec: 0,
            reps_per_set: default_reps_per_set(),
            rest_between_sets_sec: 0,
            sets: 0,
            cooldown_sec: 0,
        }
    }
}

/// Validated timing parameters.
///
/// `work_sec`, `reps_per_set` and `sets` are strictly positive; the
/// remaining durations may be zero, in which case the corresponding phase
/// is simply not generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimingSpec", into = "TimingSpec")]
pub struct TimingConfig {
    warmup_sec: u32,
    work_sec: u32,
    rest_between_reps_sec: u32,
    reps_per_set: u32,
    rest_between_sets_sec: u32,
    sets: u32,
    cooldown_sec: u32,
}

impl TimingConfig {
    /// Validates `spec` and freezes it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first of
    /// `work_sec`, `reps_per_set`, `sets` that is zero.
    pub fn new(spec: TimingSpec) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("work_sec", spec.work_sec),
            ("reps_per_set", spec.reps_per_set),
            ("sets", spec.sets),
        ] {
            if value == 0 {
                return Err(ConfigError::invalid_value(
                    field,
                    value,
                    "a value greater than 0",
                ));
            }
        }

        Ok(Self {
            warmup_sec: spec.warmup_sec,
            work_sec: spec.work_sec,
            rest_between_reps_sec: spec.rest_between_reps_sec,
            reps_per_set: spec.reps_per_set,
            rest_between_sets_sec: spec.rest_between_sets_sec,
            sets: spec.sets,
            cooldown_sec: spec.cooldown_sec,
        })
    }

    #[must_use]
    pub const fn warmup_sec(&self) -> u32 {
        self.warmup_sec
    }

    #[must_use]
    pub const fn work_sec(&self) -> u32 {
        self.work_sec
    }

    #[must_use]
    pub const fn rest_between_reps_sec(&self) -> u32 {
        self.rest_between_reps_sec
    }

    #[must_use]
    pub const fn reps_per_set(&self) -> u32 {
        self.reps_per_set
    }

    #[must_use]
    pub const fn rest_between_sets_sec(&self) -> u32 {
        self.rest_between_sets_sec
    }

    #[must_use]
    pub const fn sets(&self) -> u32 {
        self.sets
    }

    #[must_use]
    pub const fn cooldown_sec(&self) -> u32 {
        self.cooldown_sec
    }

    /// Closed-form total session length in seconds.
    ///
    /// Equal to the sum of the durations produced by
    /// [`expand`](crate::phase::expand), without materializing the phases.
    /// Returns `None` when the total does not fit in a `u64`.
    #[must_use]
    pub fn total_duration_sec(&self) -> Option<u64> {
        let sets = u64::from(self.sets);
        let reps = u64::from(self.reps_per_set);
        let work = sets.checked_mul(reps)?.checked_mul(u64::from(self.work_sec))?;
        let rep_rests = (reps - 1)
            .checked_mul(sets)?
            .checked_mul(u64::from(self.rest_between_reps_sec))?;
        let set_rests = (sets - 1).checked_mul(u64::from(self.rest_between_sets_sec))?;
        u64::from(self.warmup_sec)
            .checked_add(work)?
            .checked_add(rep_rests)?
            .checked_add(set_rests)?
            .checked_add(u64::from(self.cooldown_sec))
    }

    /// Closed-form number of phases the expander emits, saturating at
    /// `u64::MAX`.
    #[must_use]
    pub const fn phase_count(&self) -> u64 {
        let sets = self.sets as u64;
        let reps = self.reps_per_set as u64;
        let mut count = sets.saturating_mul(reps);
        if self.warmup_sec > 0 {
            count = count.saturating_add(1);
        }
        if self.rest_between_reps_sec > 0 {
            count = count.saturating_add((reps - 1).saturating_mul(sets));
        }
        if self.rest_between_sets_sec > 0 {
            count = count.saturating_add(sets - 1);
        }
        if self.cooldown_sec > 0 {
            count = count.saturating_add(1);
        }
        count
    }

    /// Checks the expanded phase count against `max_phases`.
    ///
    /// # Errors
    ///
    /// Returns the actual phase count when it exceeds the limit.
    pub fn check_phase_limit(&self, max_phases: usize) -> Result<(), u64> {
        let count = self.phase_count();
        if count > u64::try_from(max_phases).unwrap_or(u64::MAX) {
            Err(count)
        } else {
            Ok(())
        }
    }
}

impl TryFrom<TimingSpec> for TimingConfig {
    type Error = ConfigError;

    fn try_from(spec: TimingSpec) -> Result<Self, Self::Error> {
        Self::new(spec)
    }
}

impl From<TimingConfig> for TimingSpec {
    fn from(t: TimingConfig) -> Self {
        Self {
            warmup_sec: t.warmup_sec,
            work_sec: t.work_sec,
            rest_between_reps_sec: t.rest_between_reps_sec,
            reps_per_set: t.reps_per_set,
            rest_between_sets_sec: t.rest_between_sets_sec,
            sets: t.sets,
            cooldown_sec: t.cooldown_sec,
        }
    }
}

// ============================================================================
// Exercise
// ============================================================================

/// The exercise performed during work phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExerciseSpec")]
pub struct Exercise {
    name: String,
    notes: String,
}

/// Unvalidated exercise shape used for deserialization.
#[derive(Deserialize)]
struct ExerciseSpec {
    name: String,
    #[serde(default)]
    notes: String,
}

impl Exercise {
    /// Creates an exercise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `name` is blank.
    pub fn new(name: impl Into<String>, notes: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "exercise.name",
                name,
                "a non-empty name",
            ));
        }
        Ok(Self {
            name,
            notes: notes.into(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }
}

impl TryFrom<ExerciseSpec> for Exercise {
    type Error = ConfigError;

    fn try_from(spec: ExerciseSpec) -> Result<Self, Self::Error> {
        Self::new(spec.name, spec.notes)
    }
}

// ============================================================================
// Workout Definition
// ============================================================================

/// A saved workout: title, timing, and optional exercise.
///
/// Definitions are owned by whoever persists them (see
/// [`WorkoutLibrary`](crate::library::WorkoutLibrary)); the phase expander
/// and session engine only read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDefinition {
    id: String,
    title: String,
    timing: TimingConfig,
    exercise: Option<Exercise>,
}

impl WorkoutDefinition {
    /// Creates a definition with a fresh random id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `title` is blank.
    pub fn new(
        title: impl Into<String>,
        timing: TimingConfig,
        exercise: Option<Exercise>,
    ) -> Result<Self, ConfigError> {
        Self::with_id(new_id(), title, timing, exercise)
    }

    /// Creates a definition with an explicit id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `id` or `title` is blank.
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        timing: TimingConfig,
        exercise: Option<Exercise>,
    ) -> Result<Self, ConfigError> {
        let id = id.into();
        let title = title.into();
        if id.trim().is_empty() {
            return Err(ConfigError::invalid_value("id", id, "a non-empty id"));
        }
        if title.trim().is_empty() {
            return Err(ConfigError::invalid_value("title", title, "a non-empty title"));
        }
        Ok(Self {
            id,
            title,
            timing,
            exercise,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    #[must_use]
    pub const fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    /// Returns a copy under a new id with ` (Copy)` appended to the title.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            title: format!("{} (Copy)", self.title),
            timing: self.timing,
            exercise: self.exercise.clone(),
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The built-in workout seeded into an empty library.
///
/// Four 20-second work intervals separated by one-minute set rests.
#[must_use]
pub fn sample_workout() -> WorkoutDefinition {
    let timing = TimingConfig {
        warmup_sec: 0,
        work_sec: 20,
        rest_between_reps_sec: 0,
        reps_per_set: 1,
        rest_between_sets_sec: 60,
        sets: 4,
        cooldown_sec: 0,
    };
    let exercise = Exercise {
        name: "Push-ups".to_owned(),
        notes: String::new(),
    };
    WorkoutDefinition {
        id: new_id(),
        title: "HIIT short".to_owned(),
        timing,
        exercise: Some(exercise),
    }
}

// ============================================================================
// Tests
// ============================================================================
