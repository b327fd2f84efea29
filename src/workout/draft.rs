//! Editor form → workout definition
//!
//! A [`WorkoutDraft`] holds the raw text of every editor field. Nothing is
//! validated until [`WorkoutDraft::build`], which reports the *first*
//! problem so a form can show a single message next to the save button.

use rand::Rng;

use crate::error::DraftError;

use super::duration::{format_duration, parse_count, parse_duration};
use super::{Exercise, TimingConfig, TimingSpec, WorkoutDefinition};

/// Exercises offered by [`suggest_exercise`].
pub const SUGGESTED_EXERCISES: &[&str] = &[
    "Push-ups",
    "Squats",
    "Lunges",
    "Plank",
    "Mountain climbers",
    "Jumping jacks",
    "Burpees",
];

/// Raw text of the workout editor's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDraft {
    pub title: String,
    pub exercise_name: String,
    pub exercise_notes: String,
    pub warmup: String,
    pub work: String,
    pub rest_between_reps: String,
    pub reps_per_set: String,
    pub rest_between_sets: String,
    pub sets: String,
    pub cooldown: String,
}

impl Default for WorkoutDraft {
    /// A blank form pre-filled with a short HIIT layout.
    fn default() -> Self {
        Self {
            title: String::new(),
            exercise_name: String::new(),
            exercise_notes: String::new(),
            warmup: format_duration(0),
            work: format_duration(20),
            rest_between_reps: format_duration(0),
            reps_per_set: "1".to_owned(),
            rest_between_sets: format_duration(60),
            sets: "4".to_owned(),
            cooldown: format_duration(0),
        }
    }
}

impl WorkoutDraft {
    /// Pre-fills the form from an existing definition.
    #[must_use]
    pub fn from_definition(def: &WorkoutDefinition) -> Self {
        let t = def.timing();
        Self {
            title: def.title().to_owned(),
            exercise_name: def
                .exercise()
                .map(|e| e.name().to_owned())
                .unwrap_or_default(),
            exercise_notes: def
                .exercise()
                .map(|e| e.notes().to_owned())
                .unwrap_or_default(),
            warmup: format_duration(i64::from(t.warmup_sec())),
            work: format_duration(i64::from(t.work_sec())),
            rest_between_reps: format_duration(i64::from(t.rest_between_reps_sec())),
            reps_per_set: t.reps_per_set().to_string(),
            rest_between_sets: format_duration(i64::from(t.rest_between_sets_sec())),
            sets: t.sets().to_string(),
            cooldown: format_duration(i64::from(t.cooldown_sec())),
        }
    }

    /// Validates the form and produces a definition.
    ///
    /// When `existing` is given the result keeps its id, so saving an edit
    /// replaces the stored entry instead of adding a new one. A blank
    /// exercise name means "no exercise"; surrounding whitespace is trimmed
    /// from title, exercise name and notes.
    ///
    /// # Errors
    ///
    /// Checks run in this order and the first failure is returned:
    /// blank title, invalid or zero work duration, any other invalid
    /// duration, invalid or zero reps/sets, more than `max_phases` phases.
    pub fn build(
        &self,
        existing: Option<&WorkoutDefinition>,
        max_phases: usize,
    ) -> Result<WorkoutDefinition, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::MissingTitle);
        }

        let work = parse_duration(&self.work)
            .filter(|w| *w > 0)
            .ok_or(DraftError::InvalidWorkDuration)?;

        let (Some(warmup), Some(rest_reps), Some(rest_sets), Some(cooldown)) = (
            parse_duration(&self.warmup),
            parse_duration(&self.rest_between_reps),
            parse_duration(&self.rest_between_sets),
            parse_duration(&self.cooldown),
        ) else {
            return Err(DraftError::InvalidDuration);
        };

        let (Some(reps), Some(sets)) = (
            parse_count(&self.reps_per_set).filter(|r| *r > 0),
            parse_count(&self.sets).filter(|s| *s > 0),
        ) else {
            return Err(DraftError::InvalidCount);
        };

        let timing = TimingConfig::new(TimingSpec {
            warmup_sec: warmup,
            work_sec: work,
            rest_between_reps_sec: rest_reps,
            reps_per_set: reps,
            rest_between_sets_sec: rest_sets,
            sets,
            cooldown_sec: cooldown,
        })
        .map_err(|_| DraftError::InvalidCount)?;
        timing
            .check_phase_limit(max_phases)
            .map_err(|count| DraftError::TooManyPhases { count, limit: max_phases })?;

        let exercise_name = self.exercise_name.trim();
        let exercise = if exercise_name.is_empty() {
            None
        } else {
            Exercise::new(exercise_name, self.exercise_notes.trim()).ok()
        };

        let built = match existing {
            Some(def) => WorkoutDefinition::with_id(def.id(), title, timing, exercise),
            None => WorkoutDefinition::new(title, timing, exercise),
        };
        built.map_err(|_| DraftError::MissingTitle)
    }
}

/// Picks a random exercise name for the editor's "surprise me" button.
pub fn suggest_exercise<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SUGGESTED_EXERCISES[rng.random_range(0..SUGGESTED_EXERCISES.len())]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::workout::sample_workout;

    const LIMIT: usize = 1000;

    fn filled() -> WorkoutDraft {
        WorkoutDraft {
            title: "  Tabata  ".into(),
            exercise_name: "Burpees".into(),
            exercise_notes: " chest to floor ".into(),
            warmup: "1:00".into(),
            work: "20".into(),
            rest_between_reps: "10".into(),
            reps_per_set: "8".into(),
            rest_between_sets: "".into(),
            sets: "1".into(),
            cooldown: "0:30".into(),
        }
    }

    #[test]
    fn test_build_valid_draft() {
        let def = filled().build(None, LIMIT).unwrap();
        assert_eq!(def.title(), "Tabata");
        assert_eq!(def.timing().warmup_sec(), 60);
        assert_eq!(def.timing().work_sec(), 20);
        assert_eq!(def.timing().rest_between_reps_sec(), 10);
        assert_eq!(def.timing().reps_per_set(), 8);
        assert_eq!(def.timing().rest_between_sets_sec(), 0);
        assert_eq!(def.timing().cooldown_sec(), 30);
        let ex = def.exercise().unwrap();
        assert_eq!(ex.name(), "Burpees");
        assert_eq!(ex.notes(), "chest to floor");
    }

    #[test]
    fn test_missing_title_reported_first() {
        let draft = WorkoutDraft {
            title: "   ".into(),
            work: "abc".into(),
            sets: "0".into(),
            ..filled()
        };
        assert_eq!(draft.build(None, LIMIT), Err(DraftError::MissingTitle));
    }

    #[test]
    fn test_zero_work_rejected() {
        let draft = WorkoutDraft {
            work: "0:00".into(),
            ..filled()
        };
        assert_eq!(draft.build(None, LIMIT), Err(DraftError::InvalidWorkDuration));
    }

    #[test]
    fn test_invalid_rest_rejected() {
        let draft = WorkoutDraft {
            rest_between_sets: "1:75".into(),
            ..filled()
        };
        assert_eq!(draft.build(None, LIMIT), Err(DraftError::InvalidDuration));
    }

    #[test]
    fn test_zero_sets_rejected() {
        let draft = WorkoutDraft {
            sets: "0".into(),
            ..filled()
        };
        assert_eq!(draft.build(None, LIMIT), Err(DraftError::InvalidCount));

        let draft = WorkoutDraft {
            reps_per_set: "x".into(),
            ..filled()
        };
        assert_eq!(draft.build(None, LIMIT), Err(DraftError::InvalidCount));
    }

    #[test]
    fn test_phase_limit_rejected() {
        let draft = WorkoutDraft {
            warmup: "0".into(),
            rest_between_reps: "0".into(),
            reps_per_set: "100000".into(),
            sets: "100000".into(),
            cooldown: "0".into(),
            ..filled()
        };
        assert_eq!(
            draft.build(None, LIMIT),
            Err(DraftError::TooManyPhases {
                count: 10_000_000_000,
                limit: LIMIT
            })
        );
        // warmup + 8 work + 7 rests + cooldown
        assert!(filled().build(None, 17).is_ok());
        assert_eq!(
            filled().build(None, 16),
            Err(DraftError::TooManyPhases { count: 17, limit: 16 })
        );
    }

    #[test]
    fn test_blank_exercise_means_none() {
        let draft = WorkoutDraft {
            exercise_name: "  ".into(),
            ..filled()
        };
        assert!(draft.build(None, LIMIT).unwrap().exercise().is_none());
    }

    #[test]
    fn test_edit_keeps_id() {
        let existing = sample_workout();
        let draft = WorkoutDraft::from_definition(&existing);
        let edited = WorkoutDraft {
            title: "Renamed".into(),
            ..draft
        }
        .build(Some(&existing), LIMIT)
        .unwrap();
        assert_eq!(edited.id(), existing.id());
        assert_eq!(edited.title(), "Renamed");
        assert_eq!(edited.timing(), existing.timing());
    }

    #[test]
    fn test_from_definition_round_trips() {
        let existing = sample_workout();
        let rebuilt = WorkoutDraft::from_definition(&existing)
            .build(Some(&existing), LIMIT)
            .unwrap();
        assert_eq!(rebuilt, existing);
    }

    #[test]
    fn test_default_form_needs_only_title() {
        let draft = WorkoutDraft {
            title: "Quick".into(),
            ..WorkoutDraft::default()
        };
        let def = draft.build(None, LIMIT).unwrap();
        assert_eq!(def.timing().total_duration_sec(), Some(320));
    }

    #[test]
    fn test_suggest_exercise_is_from_list() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert!(SUGGESTED_EXERCISES.contains(&suggest_exercise(&mut rng)));
        }
    }
}
