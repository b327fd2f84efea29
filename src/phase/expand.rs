//! Phase expansion
//!
//! Turns a [`WorkoutDefinition`] into the flat, ordered list of timed
//! segments a session runs through. Pure and deterministic: no clock, no
//! state, and the same definition always yields the same list.

use serde::Serialize;

use crate::workout::{Exercise, WorkoutDefinition};

/// Label of the warmup phase.
pub const WARMUP_LABEL: &str = "Warmup";
/// Label of a rest between reps of the same set.
pub const REST_LABEL: &str = "Rest";
/// Label of a rest between two sets.
pub const SET_REST_LABEL: &str = "Set rest";
/// Label of the cooldown phase.
pub const COOLDOWN_LABEL: &str = "Cooldown";

/// Kind of a timed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    Warmup,
    #[default]
    Work,
    Rest,
    Cooldown,
}

impl std::fmt::Display for PhaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Warmup => "WARMUP",
            Self::Work => "WORK",
            Self::Rest => "REST",
            Self::Cooldown => "COOLDOWN",
        };
        f.write_str(s)
    }
}

/// One contiguous timed segment of a session.
///
/// `duration_sec` is always positive: the expander never emits empty
/// segments. Only work phases carry the workout's exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub phase_type: PhaseType,
    pub duration_sec: u32,
    pub label: String,
    pub exercise: Option<Exercise>,
}

impl Phase {
    fn new(phase_type: PhaseType, duration_sec: u32, label: impl Into<String>) -> Self {
        Self {
            phase_type,
            duration_sec,
            label: label.into(),
            exercise: None,
        }
    }

    /// Phase length in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_sec) * 1000
    }
}

/// Upper bound on up-front allocation; larger schedules grow as they go.
const MAX_PREALLOC: usize = 4096;

/// Expands a workout into its ordered phase list.
///
/// Layout: optional warmup, then for every set and every rep a work
/// phase, followed by a rest between reps (all but the last rep of a set)
/// or a rest between sets (last rep of every set but the last). Warmup,
/// rests and cooldown configured as zero are left out entirely.
#[must_use]
pub fn expand(def: &WorkoutDefinition) -> Vec<Phase> {
    let t = def.timing();
    let capacity = usize::try_from(t.phase_count()).map_or(MAX_PREALLOC, |n| n.min(MAX_PREALLOC));
    let mut phases = Vec::with_capacity(capacity);

    if t.warmup_sec() > 0 {
        phases.push(Phase::new(PhaseType::Warmup, t.warmup_sec(), WARMUP_LABEL));
    }

    for set in 1..=t.sets() {
        for rep in 1..=t.reps_per_set() {
            phases.push(Phase {
                exercise: def.exercise().cloned(),
                ..Phase::new(
                    PhaseType::Work,
                    t.work_sec(),
                    work_label(set, t.sets(), rep, t.reps_per_set()),
                )
            });

            if rep < t.reps_per_set() {
                if t.rest_between_reps_sec() > 0 {
                    phases.push(Phase::new(
                        PhaseType::Rest,
                        t.rest_between_reps_sec(),
                        REST_LABEL,
                    ));
                }
            } else if set < t.sets() && t.rest_between_sets_sec() > 0 {
                phases.push(Phase::new(
                    PhaseType::Rest,
                    t.rest_between_sets_sec(),
                    SET_REST_LABEL,
                ));
            }
        }
    }

    if t.cooldown_sec() > 0 {
        phases.push(Phase::new(PhaseType::Cooldown, t.cooldown_sec(), COOLDOWN_LABEL));
    }

    phases
}

/// Sum of all phase durations in seconds.
#[must_use]
pub fn total_duration_sec(phases: &[Phase]) -> u64 {
    phases.iter().map(|p| u64::from(p.duration_sec)).sum()
}

fn work_label(set: u32, sets: u32, rep: u32, reps: u32) -> String {
    format!("Set {set}/{sets} · Rep {rep}/{reps}")
}
