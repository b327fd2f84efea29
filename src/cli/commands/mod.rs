//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod library;
pub mod plan;
pub mod run;
pub mod validate;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, LibrarySubcommand, WorkoutSource};
use crate::config::WorkoutLoader;
use crate::error::{LibraryError, TrainerError};
use crate::library::WorkoutLibrary;
use crate::workout::{WorkoutDefinition, sample_workout};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `cancel` fires on the first SIGINT/SIGTERM; long-running commands stop
/// at their next opportunity.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), TrainerError> {
    match cli.command {
        Commands::Run(args) => run::run(&args, cancel).await,
        Commands::Plan(args) => plan::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Library(cmd) => {
            let lib = WorkoutLibrary::open(&cmd.library);
            match cmd.subcommand {
                LibrarySubcommand::List(args) => library::list(&lib, &args),
                LibrarySubcommand::Show(args) => library::show(&lib, &args),
                LibrarySubcommand::Add(args) => library::add(&lib, &args),
                LibrarySubcommand::Remove(args) => library::remove(&lib, &args),
                LibrarySubcommand::Duplicate(args) => library::duplicate(&lib, &args),
                LibrarySubcommand::Clear(args) => library::clear(&lib, &args),
            }
        }
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Resolves the workout named by `source`.
///
/// A document path wins, then a library id; with neither, the first saved
/// workout is used (seeding the sample into an empty library).
///
/// # Errors
///
/// Returns an error if the document fails to load or the id is unknown.
pub fn resolve_workout(source: &WorkoutSource) -> Result<WorkoutDefinition, TrainerError> {
    if let Some(path) = &source.workout {
        tracing::info!(file = %path.display(), "loading workout document");
        let loaded = WorkoutLoader::with_defaults().load(path)?;
        for warning in &loaded.warnings {
            tracing::warn!(location = %warning.path, "{}", warning.message);
        }
        return Ok(loaded.workout);
    }

    let lib = WorkoutLibrary::open(&source.library);
    if let Some(id) = &source.id {
        return lib
            .get(id)?
            .ok_or_else(|| LibraryError::NotFound { id: id.clone() }.into());
    }

    lib.ensure_seeded(&sample_workout())?;
    lib.list()?.into_iter().next().ok_or_else(|| {
        TrainerError::Usage(format!(
            "no usable workouts in {}; pass --workout or add one with `library add`",
            lib.path().display()
        ))
    })
}
