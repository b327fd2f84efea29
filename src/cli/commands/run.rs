//! `run`: drive a workout session in the terminal.
//!
//! Three tasks cooperate: the [`SessionRunner`] owns the engine, a stdin
//! reader turns typed letters into [`RunnerCommand`]s, and this function
//! renders each published snapshot plus the feedback cues it triggers.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::commands::resolve_workout;
use crate::cli::render::snapshot_line;
use crate::error::TrainerError;
use crate::feedback::{Cue, FeedbackTracker};
use crate::observability::{EventEmitter, StopReason};
use crate::phase::{SessionEngine, expand};
use crate::runner::{RunnerCommand, SessionRunner};

const KEY_HELP: &str = "keys: s start, p pause, r resume, n next, x stop, q quit";

/// Runs the selected workout until it finishes, the user quits, or a
/// signal arrives.
///
/// # Errors
///
/// Returns [`TrainerError::Interrupted`] when cancelled, or an error if the
/// workout cannot be resolved or the event file cannot be created.
pub async fn run(args: &RunArgs, cancel: CancellationToken) -> Result<(), TrainerError> {
    let def = resolve_workout(&args.source)?;
    let phases = expand(&def);
    tracing::info!(
        id = def.id(),
        title = def.title(),
        phases = phases.len(),
        "starting session runner"
    );

    let events = match &args.events {
        Some(path) => Arc::new(EventEmitter::from_file(path)?),
        None => Arc::new(EventEmitter::noop()),
    };

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (snap_tx, mut snap_rx) = mpsc::unbounded_channel();

    let runner = SessionRunner::new(SessionEngine::new(phases), cmd_rx, snap_tx)
        .with_events(events)
        .with_cancel(cancel)
        .tick_every(Duration::from_millis(args.tick_ms))
        .exit_on_finish(!args.keep_open);
    let runner_handle = tokio::spawn(runner.run());

    if args.autostart {
        let _ = cmd_tx.send(RunnerCommand::Start).await;
    }
    let reader = tokio::spawn(read_commands(cmd_tx));

    if args.format == OutputFormat::Human {
        println!("{}", def.title());
        eprintln!("{KEY_HELP}");
    }

    let mut tracker = FeedbackTracker::new();
    let mut stdout = std::io::stdout();
    while let Some(snap) = snap_rx.recv().await {
        let cues = tracker.observe(&snap);
        match args.format {
            OutputFormat::Human => {
                let _ = writeln!(stdout, "{}", snapshot_line(&snap));
            }
            OutputFormat::Json => {
                if let Ok(line) = serde_json::to_string(&snap) {
                    let _ = writeln!(stdout, "{line}");
                }
                for cue in &cues {
                    if let Ok(line) = serde_json::to_string(cue) {
                        let _ = writeln!(stdout, "{line}");
                    }
                }
            }
        }
        if args.bell && cues.iter().any(audible) {
            let _ = write!(stdout, "\x07");
        }
        let _ = stdout.flush();
    }

    reader.abort();
    let outcome = runner_handle
        .await
        .map_err(|e| TrainerError::Io(std::io::Error::other(e)))?;

    tracing::info!(reason = ?outcome.reason, summary = %outcome.summary, "session runner exited");
    if outcome.reason == StopReason::Interrupted {
        return Err(TrainerError::Interrupted);
    }
    Ok(())
}

/// Phase changes and countdown seconds make a sound; keep-awake does not.
const fn audible(cue: &Cue) -> bool {
    matches!(cue, Cue::PhaseChanged { .. } | Cue::Countdown { .. })
}

/// Forwards stdin lines as commands until EOF, `q`, or the runner goes away.
async fn read_commands(tx: mpsc::Sender<RunnerCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(cmd) = RunnerCommand::from_key(&line) else {
            tracing::warn!(input = %line.trim(), "{KEY_HELP}");
            continue;
        };
        if tx.send(cmd).await.is_err() || cmd == RunnerCommand::Quit {
            break;
        }
    }
    tracing::debug!("command reader finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_phase_and_countdown_cues_ring() {
        assert!(audible(&Cue::PhaseChanged { index: 0 }));
        assert!(audible(&Cue::Countdown { remaining_sec: 2 }));
        assert!(!audible(&Cue::KeepAwake { on: true }));
    }
}
