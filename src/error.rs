//! Error types for `interval-trainer`
//!
//! The session engine itself never fails: command misuse is a no-op and
//! text parsing reports absence with `Option`. Errors exist at the edges,
//! where workout documents are loaded and validated, where a
//! [`TimingConfig`](crate::workout::TimingConfig) is constructed, and where
//! the workout library touches the filesystem.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `interval-trainer` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid workout document, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Workout library error (unknown id, unwritable store)
    pub const LIBRARY_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `interval-trainer` operations.
///
/// Aggregates the domain errors and maps each one to an exit code.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// Workout document loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workout library error
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Editor form input rejected
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Invalid combination of command-line arguments
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Session interrupted by a signal
    #[error("interrupted")]
    Interrupted,
}

impl TrainerError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Draft(_) | Self::Json(_) | Self::Yaml(_) => {
                ExitCode::CONFIG_ERROR
            }
            Self::Library(_) => ExitCode::LIBRARY_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Interrupted => ExitCode::INTERRUPTED,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Workout document loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML/JSON parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the workout document
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Workout validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path (or other origin label) of the workout document
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced workout document not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Workout document exceeds the configured size limit
    #[error("file too large: {path} ({size} bytes, limit {limit})")]
    FileTooLarge {
        /// Path to the oversized file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`].
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while validating a workout document.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "workout.timing.work")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents the workout from being used
    Error,
    /// Warning - potential issue that does not prevent loading
    Warning,
}

// ============================================================================
// Library Errors
// ============================================================================

/// Errors raised by the file-backed workout library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Reading or writing the library file failed
    #[error("library I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the library contents failed
    #[error("library encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// No workout with the given id exists
    #[error("no workout with id '{id}'")]
    NotFound {
        /// The id that was looked up
        id: String,
    },
}

// ============================================================================
// Draft Errors
// ============================================================================

/// First problem found while turning editor text into a workout.
///
/// Each variant's message is suitable for showing next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Title field is blank
    #[error("please enter a title")]
    MissingTitle,

    /// Work duration is unparseable or zero
    #[error("work duration is invalid (e.g. 00:20)")]
    InvalidWorkDuration,

    /// Warmup, rest or cooldown duration is unparseable
    #[error("a duration is invalid (mm:ss)")]
    InvalidDuration,

    /// Reps or sets is unparseable or zero
    #[error("sets and reps must be greater than 0")]
    InvalidCount,

    /// Sets and reps expand to more phases than allowed
    #[error("workout expands to {count} phases, more than the limit of {limit}")]
    TooManyPhases { count: u64, limit: usize },
}

// ============================================================================
// Tests
// ============================================================================
