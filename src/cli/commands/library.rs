//! `library`: manage saved workouts.

use crate::cli::args::{
    DraftFields, LibraryAddArgs, LibraryClearArgs, LibraryIdArgs, LibraryListArgs, OutputFormat,
};
use crate::cli::render::workout_line;
use crate::config::{WorkoutFile, WorkoutLoader};
use crate::error::{LibraryError, TrainerError};
use crate::library::{WorkoutLibrary, encode};
use crate::workout::{WorkoutDefinition, WorkoutDraft, sample_workout, suggest_exercise};

/// Lists saved workouts, seeding the sample into an empty library first.
///
/// # Errors
///
/// Returns an error if the library cannot be read or written.
pub fn list(lib: &WorkoutLibrary, args: &LibraryListArgs) -> Result<(), TrainerError> {
    lib.ensure_seeded(&sample_workout())?;
    let all = lib.list()?;
    match args.format {
        OutputFormat::Human => {
            for def in &all {
                println!("{}", workout_line(def));
            }
        }
        OutputFormat::Json => println!("{}", encode(&all)?),
    }
    Ok(())
}

/// Prints one workout as a YAML document that `run --workout` accepts.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] for an unknown id.
pub fn show(lib: &WorkoutLibrary, args: &LibraryIdArgs) -> Result<(), TrainerError> {
    let def = find(lib, &args.id)?;
    print!("{}", serde_yaml::to_string(&WorkoutFile::from(&def))?);
    Ok(())
}

/// Adds or edits a workout and prints its id.
///
/// # Errors
///
/// Returns an error if the document is invalid, the editor fields are
/// rejected, or the edited id is unknown.
pub fn add(lib: &WorkoutLibrary, args: &LibraryAddArgs) -> Result<(), TrainerError> {
    let def = if let Some(path) = &args.workout {
        WorkoutLoader::with_defaults().load(path)?.workout
    } else {
        let existing = args.edit.as_deref().map(|id| find(lib, id)).transpose()?;
        let mut draft = existing
            .as_ref()
            .map_or_else(WorkoutDraft::default, WorkoutDraft::from_definition);
        apply_fields(&mut draft, &args.fields);
        if args.random_exercise && draft.exercise_name.trim().is_empty() {
            draft.exercise_name = suggest_exercise(&mut rand::rng()).to_owned();
        }
        draft.build(existing.as_ref(), lib.max_phases())?
    };

    lib.upsert(&def)?;
    tracing::info!(id = def.id(), title = def.title(), "workout saved");
    println!("{}", def.id());
    Ok(())
}

/// Removes a workout; unknown ids are reported but not an error.
///
/// # Errors
///
/// Returns an error if the library cannot be read or written.
pub fn remove(lib: &WorkoutLibrary, args: &LibraryIdArgs) -> Result<(), TrainerError> {
    if lib.delete(&args.id)? == 0 {
        tracing::warn!(id = %args.id, "no workout with this id");
    }
    Ok(())
}

/// Duplicates a workout and prints the copy's id.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] for an unknown id.
pub fn duplicate(lib: &WorkoutLibrary, args: &LibraryIdArgs) -> Result<(), TrainerError> {
    let copy = lib.duplicate(&args.id)?;
    println!("{}", copy.id());
    Ok(())
}

/// Deletes the library file.
///
/// # Errors
///
/// Returns a usage error without `--yes`.
pub fn clear(lib: &WorkoutLibrary, args: &LibraryClearArgs) -> Result<(), TrainerError> {
    if !args.yes {
        return Err(TrainerError::Usage(
            "refusing to delete every saved workout without --yes".to_string(),
        ));
    }
    lib.clear_all()?;
    Ok(())
}

fn find(lib: &WorkoutLibrary, id: &str) -> Result<WorkoutDefinition, LibraryError> {
    lib.get(id)?
        .ok_or_else(|| LibraryError::NotFound { id: id.to_owned() })
}

/// Overwrites draft text with every field given on the command line.
fn apply_fields(draft: &mut WorkoutDraft, fields: &DraftFields) {
    let pairs = [
        (&mut draft.title, &fields.title),
        (&mut draft.exercise_name, &fields.exercise),
        (&mut draft.exercise_notes, &fields.notes),
        (&mut draft.warmup, &fields.warmup),
        (&mut draft.work, &fields.work),
        (&mut draft.rest_between_reps, &fields.rest_reps),
        (&mut draft.reps_per_set, &fields.reps),
        (&mut draft.rest_between_sets, &fields.rest_sets),
        (&mut draft.sets, &fields.sets),
        (&mut draft.cooldown, &fields.cooldown),
    ];
    for (slot, value) in pairs {
        if let Some(v) = value {
            slot.clone_from(v);
        }
    }
}
