//! Workout document schema.
//!
//! These types mirror the on-disk YAML layout and are deliberately loose:
//! durations may be written as integer seconds or as `MM:SS` text, and
//! required fields are optional here so that [`Validator`] can report every
//! missing field at once instead of failing on the first one.
//!
//! [`Validator`]: crate::config::Validator

use serde::{Deserialize, Serialize};

use crate::workout::{WorkoutDefinition, format_duration, parse_duration};

/// Top-level document: everything lives under a `workout:` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutFile {
    /// The workout itself.
    pub workout: WorkoutDocument,
}

/// A workout as written by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutDocument {
    /// Stable identifier; a fresh one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Exercise performed during work phases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<ExerciseDocument>,

    /// Interval timing.
    #[serde(default)]
    pub timing: TimingDocument,
}

/// Exercise block of a workout document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseDocument {
    /// Exercise name.
    #[serde(default)]
    pub name: String,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Timing block of a workout document.
///
/// Absent optional durations default to zero and absent `reps_per_set`
/// defaults to one; `work` and `sets` have no default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingDocument {
    /// Warmup before the first set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup: Option<DurationValue>,

    /// Length of each work interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<DurationValue>,

    /// Rest between reps inside a set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_between_reps: Option<DurationValue>,

    /// Reps per set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps_per_set: Option<u32>,

    /// Rest between sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_between_sets: Option<DurationValue>,

    /// Number of sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,

    /// Cooldown after the last set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<DurationValue>,
}

/// A duration written either as whole seconds or as clock text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    /// Whole seconds, e.g. `90`.
    Seconds(u32),
    /// `SS`, `MM:SS` or `H:MM:SS`, e.g. `"01:30"`.
    Text(String),
}

impl DurationValue {
    /// Resolves to whole seconds, or `None` if the text is malformed.
    #[must_use]
    pub fn seconds(&self) -> Option<u32> {
        match self {
            Self::Seconds(s) => Some(*s),
            Self::Text(t) => parse_duration(t),
        }
    }
}

impl std::fmt::Display for DurationValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seconds(s) => write!(f, "{s}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

impl From<&WorkoutDefinition> for WorkoutFile {
    fn from(def: &WorkoutDefinition) -> Self {
        let t = def.timing();
        let text = |sec: u32| Some(DurationValue::Text(format_duration(i64::from(sec))));
        Self {
            workout: WorkoutDocument {
                id: Some(def.id().to_owned()),
                title: def.title().to_owned(),
                exercise: def.exercise().map(|e| ExerciseDocument {
                    name: e.name().to_owned(),
                    notes: e.notes().to_owned(),
                }),
                timing: TimingDocument {
                    warmup: text(t.warmup_sec()),
                    work: text(t.work_sec()),
                    rest_between_reps: text(t.rest_between_reps_sec()),
                    reps_per_set: Some(t.reps_per_set()),
                    rest_between_sets: text(t.rest_between_sets_sec()),
                    sets: Some(t.sets()),
                    cooldown: text(t.cooldown_sec()),
                },
            },
        }
    }
}
