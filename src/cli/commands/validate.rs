//! `validate`: check workout documents without running them.

use std::path::Path;

use serde_json::json;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{LoadResult, WorkoutLoader};
use crate::error::{ConfigError, TrainerError, ValidationIssue};
use crate::workout::format_duration;

/// Validates every file, reporting all of them before failing.
///
/// # Errors
///
/// Returns the first file's error once all files have been checked. With
/// `--strict`, warnings count as errors.
pub fn run(args: &ValidateArgs) -> Result<(), TrainerError> {
    let loader = WorkoutLoader::with_defaults();
    let mut first_error: Option<ConfigError> = None;
    let mut reports = Vec::new();

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating workout");
        let outcome = loader.load(path).and_then(|loaded| strict_check(path, loaded, args.strict));

        match args.format {
            OutputFormat::Human => print_human(path, &outcome),
            OutputFormat::Json => reports.push(json_report(path, &outcome)),
        }

        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }

    if args.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}

fn strict_check(path: &Path, loaded: LoadResult, strict: bool) -> Result<LoadResult, ConfigError> {
    if strict && !loaded.warnings.is_empty() {
        return Err(ConfigError::ValidationError {
            path: path.display().to_string(),
            errors: loaded.warnings,
        });
    }
    Ok(loaded)
}

fn print_human(path: &Path, outcome: &Result<LoadResult, ConfigError>) {
    match outcome {
        Ok(loaded) => {
            let timing = loaded.workout.timing();
            println!(
                "ok: {} ({}, {} phases, {})",
                path.display(),
                loaded.workout.title(),
                timing.phase_count(),
                timing
                    .total_duration_sec()
                    .map_or_else(|| "--:--".to_owned(), |t| format_duration(i64::try_from(t).unwrap_or(i64::MAX))),
            );
            for warning in &loaded.warnings {
                println!("  {warning}");
            }
        }
        Err(ConfigError::ValidationError { errors, .. }) => {
            println!("invalid: {}", path.display());
            for issue in errors {
                println!("  {issue}");
            }
        }
        Err(e) => println!("invalid: {}: {e}", path.display()),
    }
}

fn json_report(path: &Path, outcome: &Result<LoadResult, ConfigError>) -> serde_json::Value {
    let issues = |list: &[ValidationIssue]| -> Vec<serde_json::Value> {
        list.iter()
            .map(|i| json!({ "path": i.path, "message": i.message }))
            .collect()
    };

    match outcome {
        Ok(loaded) => json!({
            "file": path.display().to_string(),
            "valid": true,
            "id": loaded.workout.id(),
            "phases": loaded.workout.timing().phase_count(),
            "total_sec": loaded.workout.timing().total_duration_sec(),
            "warnings": issues(&loaded.warnings),
            "errors": [],
        }),
        Err(ConfigError::ValidationError { errors, .. }) => json!({
            "file": path.display().to_string(),
            "valid": false,
            "warnings": [],
            "errors": issues(errors),
        }),
        Err(e) => json!({
            "file": path.display().to_string(),
            "valid": false,
            "warnings": [],
            "errors": [{ "path": "", "message": e.to_string() }],
        }),
    }
}
