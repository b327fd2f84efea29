//! Workout document loader
//!
//! Reads a workout file, parses it as YAML, validates it and builds a
//! [`WorkoutDefinition`]. JSON documents load too, being a subset of YAML.

use std::path::Path;

use crate::config::schema::{DurationValue, WorkoutDocument, WorkoutFile};
use crate::config::validation::Validator;
use crate::error::{ConfigError, ValidationIssue};
use crate::workout::{Exercise, TimingConfig, TimingSpec, WorkoutDefinition};

// ============================================================================
// Public API
// ============================================================================

/// Options for the workout loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits on document size and shape.
    pub limits: ConfigLimits,
}

/// Limits that keep a hostile or mistaken document from exhausting memory.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of phases a workout may expand to.
    pub max_phases: usize,

    /// Maximum document size in bytes.
    pub max_file_size: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_phases: env_or("INTERVAL_TRAINER_MAX_PHASES", 1000),
            max_file_size: env_or("INTERVAL_TRAINER_MAX_FILE_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a workout document.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated workout.
    pub workout: WorkoutDefinition,

    /// Non-fatal issues found during validation.
    pub warnings: Vec<ValidationIssue>,
}

/// Workout document loader.
#[derive(Debug, Default)]
pub struct WorkoutLoader {
    options: LoaderOptions,
}

impl WorkoutLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads and validates the workout document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file exceeds [`ConfigLimits::max_file_size`]
    /// - YAML parsing fails
    /// - Validation reports any error
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.limits.max_file_size;
        if metadata.len() > limit {
            return Err(ConfigError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_str(&content, path)
    }

    /// Parses and validates an in-memory document.
    ///
    /// `origin` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn load_str(&self, content: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.len() as u64 > self.options.limits.max_file_size {
            return Err(ConfigError::FileTooLarge {
                path: origin.to_path_buf(),
                size: content.len() as u64,
                limit: self.options.limits.max_file_size,
            });
        }

        if content.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: origin.to_path_buf(),
                line: None,
                message: "workout document is empty".to_string(),
            });
        }

        let file: WorkoutFile =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                path: origin.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        let result = Validator::new().validate(&file.workout, &self.options.limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: origin.display().to_string(),
                errors: result.errors,
            });
        }

        for warning in &result.warnings {
            tracing::debug!(path = %warning.path, "{}", warning.message);
        }

        let workout = build_definition(&file.workout)?;
        tracing::debug!(
            id = workout.id(),
            title = workout.title(),
            origin = %origin.display(),
            "workout loaded"
        );

        Ok(LoadResult {
            workout,
            warnings: result.warnings,
        })
    }
}

/// Builds a definition from a document that already passed validation.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first unusable field; a
/// validated document never produces one.
pub fn build_definition(doc: &WorkoutDocument) -> Result<WorkoutDefinition, ConfigError> {
    let t = &doc.timing;
    let spec = TimingSpec {
        warmup_sec: optional_seconds("warmup", t.warmup.as_ref())?,
        work_sec: required_seconds("work", t.work.as_ref())?,
        rest_between_reps_sec: optional_seconds("rest_between_reps", t.rest_between_reps.as_ref())?,
        reps_per_set: t.reps_per_set.unwrap_or(1),
        rest_between_sets_sec: optional_seconds("rest_between_sets", t.rest_between_sets.as_ref())?,
        sets: t
            .sets
            .ok_or_else(|| ConfigError::invalid_value("sets", "", "a number of sets"))?,
        cooldown_sec: optional_seconds("cooldown", t.cooldown.as_ref())?,
    };
    let timing = TimingConfig::new(spec)?;

    let exercise = doc
        .exercise
        .as_ref()
        .map(|e| Exercise::new(e.name.clone(), e.notes.clone()))
        .transpose()?;

    match &doc.id {
        Some(id) => WorkoutDefinition::with_id(id.clone(), doc.title.clone(), timing, exercise),
        None => WorkoutDefinition::new(doc.title.clone(), timing, exercise),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn optional_seconds(field: &str, value: Option<&DurationValue>) -> Result<u32, ConfigError> {
    value.map_or(Ok(0), |v| required_seconds(field, Some(v)))
}

fn required_seconds(field: &str, value: Option<&DurationValue>) -> Result<u32, ConfigError> {
    let value =
        value.ok_or_else(|| ConfigError::invalid_value(field, "", "a duration"))?;
    value
        .seconds()
        .ok_or_else(|| ConfigError::invalid_value(field, value, "seconds, MM:SS or H:MM:SS"))
}

/// Reads a limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
