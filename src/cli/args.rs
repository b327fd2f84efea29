//! CLI argument definitions
//!
//! All Clap derive structs for `interval-trainer` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::library::DEFAULT_LIBRARY_FILE;

// ============================================================================
// Root CLI
// ============================================================================

/// Interval timer for HIIT-style workouts.
#[derive(Parser, Debug)]
#[command(name = "interval-trainer", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(
        long,
        default_value = "auto",
        global = true,
        env = "INTERVAL_TRAINER_COLOR"
    )]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a workout session in the terminal.
    Run(RunArgs),

    /// Print the phase plan of a workout without running it.
    Plan(PlanArgs),

    /// Validate workout documents.
    Validate(ValidateArgs),

    /// Manage saved workouts.
    Library(LibraryCommand),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Workout Source
// ============================================================================

/// Where a workout comes from: a document, a library id, or (when neither
/// is given) the first saved workout.
#[derive(Args, Debug, Clone)]
#[command(group = clap::ArgGroup::new("source").multiple(false))]
pub struct WorkoutSource {
    /// Path to a YAML or JSON workout document.
    #[arg(short, long, group = "source")]
    pub workout: Option<PathBuf>,

    /// Id of a saved workout.
    #[arg(long, group = "source")]
    pub id: Option<String>,

    /// Path to the workout library file.
    #[arg(long, default_value = DEFAULT_LIBRARY_FILE, env = "INTERVAL_TRAINER_LIBRARY")]
    pub library: PathBuf,
}

// ============================================================================
// Run / Plan / Validate
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: WorkoutSource,

    /// Output format for session updates.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Start immediately instead of waiting for `s`.
    #[arg(long)]
    pub autostart: bool,

    /// Ring the terminal bell on phase changes and countdown seconds.
    #[arg(long)]
    pub bell: bool,

    /// Keep waiting for commands after the session finishes.
    #[arg(long)]
    pub keep_open: bool,

    /// Tick period in milliseconds.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(10..=1000))]
    pub tick_ms: u64,

    /// Write lifecycle events as JSONL to this file.
    #[arg(long, env = "INTERVAL_TRAINER_EVENTS")]
    pub events: Option<PathBuf>,
}

/// Arguments for `plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: WorkoutSource,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Workout documents to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Library Command
// ============================================================================

/// Saved workout management.
#[derive(Args, Debug)]
pub struct LibraryCommand {
    /// Path to the workout library file.
    #[arg(long, default_value = DEFAULT_LIBRARY_FILE, env = "INTERVAL_TRAINER_LIBRARY", global = true)]
    pub library: PathBuf,

    /// Library subcommand.
    #[command(subcommand)]
    pub subcommand: LibrarySubcommand,
}

/// Library subcommands.
#[derive(Subcommand, Debug)]
pub enum LibrarySubcommand {
    /// List saved workouts (seeding the sample workout into an empty library).
    List(LibraryListArgs),

    /// Print a saved workout as a YAML document.
    Show(LibraryIdArgs),

    /// Add a workout, or replace one with the same id.
    Add(LibraryAddArgs),

    /// Remove a workout.
    Remove(LibraryIdArgs),

    /// Copy a workout under a new id.
    Duplicate(LibraryIdArgs),

    /// Delete the library file.
    Clear(LibraryClearArgs),
}

/// Arguments for `library list`.
#[derive(Args, Debug)]
pub struct LibraryListArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// A single workout id.
#[derive(Args, Debug)]
pub struct LibraryIdArgs {
    /// Workout id.
    pub id: String,
}

/// Arguments for `library add`.
///
/// Either `--workout FILE` or the editor fields; editor fields take the
/// same text an editing form would (`MM:SS` durations, integer counts).
#[derive(Args, Debug)]
pub struct LibraryAddArgs {
    /// Import a YAML or JSON workout document.
    #[arg(short, long, conflicts_with_all = ["title", "edit"])]
    pub workout: Option<PathBuf>,

    /// Edit the saved workout with this id; unspecified fields keep their values.
    #[arg(long)]
    pub edit: Option<String>,

    #[command(flatten)]
    pub fields: DraftFields,

    /// Fill in a random exercise when none is given.
    #[arg(long)]
    pub random_exercise: bool,
}

/// Editor text fields. Unset fields keep the form's current value.
#[derive(Args, Debug, Default)]
pub struct DraftFields {
    /// Workout title.
    #[arg(long)]
    pub title: Option<String>,

    /// Exercise name (empty for none).
    #[arg(long)]
    pub exercise: Option<String>,

    /// Exercise notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// Warmup duration.
    #[arg(long)]
    pub warmup: Option<String>,

    /// Work interval duration.
    #[arg(long)]
    pub work: Option<String>,

    /// Rest between reps.
    #[arg(long)]
    pub rest_reps: Option<String>,

    /// Reps per set.
    #[arg(long)]
    pub reps: Option<String>,

    /// Rest between sets.
    #[arg(long)]
    pub rest_sets: Option<String>,

    /// Number of sets.
    #[arg(long)]
    pub sets: Option<String>,

    /// Cooldown duration.
    #[arg(long)]
    pub cooldown: Option<String>,
}

/// Arguments for `library clear`.
#[derive(Args, Debug)]
pub struct LibraryClearArgs {
    /// Confirm deletion of every saved workout.
    #[arg(long)]
    pub yes: bool,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
