//! Logging initialization.
//!
//! Diagnostics go to stderr through `tracing`, in human-readable or JSON
//! form. `INTERVAL_TRAINER_LOG_LEVEL` overrides the `-v` count when set.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "INTERVAL_TRAINER_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Maps a verbosity level to a tracing directive string.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolves whether ANSI escapes should be written to stderr.
#[must_use]
pub fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Builds the event filter from the [`LOG_LEVEL_ENV`] value and `-v` count.
///
/// A non-blank, parseable environment directive takes precedence; an
/// unparseable one is reported and ignored.
#[must_use]
pub fn build_filter(env_value: Option<&str>, verbosity: u8) -> EnvFilter {
    let fallback = || EnvFilter::new(verbosity_to_directive(verbosity));
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("warning: ignoring {LOG_LEVEL_ENV}={directive:?}: {e}");
            fallback()
        }),
        None => fallback(),
    }
}

/// Initializes the global tracing subscriber.
///
/// Uses `try_init()` so calling this more than once (e.g. in tests) is safe.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let env_value = std::env::var(LOG_LEVEL_ENV).ok();
    let filter = build_filter(env_value.as_deref(), verbosity);

    let show_target = verbosity >= 2;

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi(color))
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
