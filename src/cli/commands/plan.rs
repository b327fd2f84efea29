//! `plan`: print the phases a workout expands to.

use serde::Serialize;

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::cli::commands::resolve_workout;
use crate::cli::render::plan_table;
use crate::error::TrainerError;
use crate::phase::{Phase, expand, total_duration_sec};
use crate::workout::WorkoutDefinition;

#[derive(Serialize)]
struct PlanOutput<'a> {
    workout: &'a WorkoutDefinition,
    phases: &'a [Phase],
    total_sec: u64,
}

/// Prints the phase plan of the selected workout.
///
/// # Errors
///
/// Returns an error if the workout cannot be resolved or serialized.
pub fn run(args: &PlanArgs) -> Result<(), TrainerError> {
    let def = resolve_workout(&args.source)?;
    let phases = expand(&def);

    match args.format {
        OutputFormat::Human => print!("{}", plan_table(&def, &phases)),
        OutputFormat::Json => {
            let out = PlanOutput {
                workout: &def,
                phases: &phases,
                total_sec: total_duration_sec(&phases),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
