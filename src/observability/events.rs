//! Structured session event stream.
//!
//! Discrete, typed events describing a session's lifecycle. Events are
//! serialized as newline-delimited JSON (JSONL) and include a monotonically
//! increasing sequence number for ordering guarantees. They are derived
//! from consecutive snapshots, so the engine itself stays side-effect free.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phase::{PhaseType, SessionSnapshot, Status};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every phase completed.
    Completed,
    /// The user quit.
    Quit,
    /// Interrupted by a signal or cancellation.
    Interrupted,
}

/// Summary statistics emitted when a run ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of phases entered (including restarts).
    pub phases_entered: u64,
    /// Number of pauses.
    pub pauses: u64,
    /// Whether the session reached the finished state.
    pub finished: bool,
    /// Wall time of the run in seconds.
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Folds one event into the counters.
    pub fn record(&mut self, event: &Event) {
        match event {
            Event::PhaseEntered { .. } => self.phases_entered += 1,
            Event::SessionPaused { .. } => self.pauses += 1,
            Event::SessionFinished { .. } => self.finished = true,
            _ => {}
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "phases={} pauses={} finished={} elapsed={:.1}s",
            self.phases_entered, self.pauses, self.finished, self.elapsed_secs,
        )
    }
}

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete session event.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The session started from idle or finished.
    SessionStarted {
        /// When the session started.
        timestamp: DateTime<Utc>,
        /// Number of phases in the session.
        phase_count: usize,
        /// Planned session length in seconds.
        total_sec: u64,
    },

    /// A phase began running.
    PhaseEntered {
        /// When the phase began.
        timestamp: DateTime<Utc>,
        /// Zero-based index of the phase.
        phase_index: usize,
        /// Kind of phase.
        phase_type: PhaseType,
        /// Display label of the phase.
        label: String,
    },

    /// The countdown was frozen.
    SessionPaused {
        /// When the pause began.
        timestamp: DateTime<Utc>,
        /// Phase that was paused.
        phase_index: usize,
        /// Seconds left in the phase at the last tick.
        remaining_sec: u64,
    },

    /// The countdown continued after a pause.
    SessionResumed {
        /// When the session resumed.
        timestamp: DateTime<Utc>,
        /// Phase that resumed.
        phase_index: usize,
    },

    /// The session was stopped and returned to idle.
    SessionStopped {
        /// When the session stopped.
        timestamp: DateTime<Utc>,
        /// Phase that was running when stopped.
        phase_index: usize,
    },

    /// Every phase completed.
    SessionFinished {
        /// When the last phase ended.
        timestamp: DateTime<Utc>,
    },

    /// The driver loop exited.
    RunEnded {
        /// When the run ended.
        timestamp: DateTime<Utc>,
        /// Why the run ended.
        reason: StopReason,
        /// Run summary statistics.
        summary: RunSummary,
    },
}

/// Derives the events implied by moving from `prev` to `next`.
///
/// Returns an empty list when nothing lifecycle-relevant changed (e.g. a
/// plain countdown tick).
#[must_use]
pub fn events_between(
    prev: &SessionSnapshot,
    next: &SessionSnapshot,
    timestamp: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();
    let was_stopped = matches!(prev.status, Status::Idle | Status::Finished);

    if next.status == Status::Running {
        if was_stopped {
            events.push(Event::SessionStarted {
                timestamp,
                phase_count: next.phase_count,
                total_sec: next.total_remaining_sec,
            });
        }
        if was_stopped || prev.phase_index != next.phase_index {
            events.push(Event::PhaseEntered {
                timestamp,
                phase_index: next.phase_index,
                phase_type: next.phase_type,
                label: next.label.clone(),
            });
        } else if prev.status == Status::Paused {
            events.push(Event::SessionResumed {
                timestamp,
                phase_index: next.phase_index,
            });
        }
    }

    match (prev.status, next.status) {
        (Status::Running, Status::Paused) => events.push(Event::SessionPaused {
            timestamp,
            phase_index: next.phase_index,
            remaining_sec: next.remaining_sec,
        }),
        (Status::Running | Status::Paused | Status::Finished, Status::Idle) => {
            events.push(Event::SessionStopped {
                timestamp,
                phase_index: prev.phase_index,
            });
        }
        (Status::Idle | Status::Running | Status::Paused, Status::Finished) => {
            events.push(Event::SessionFinished { timestamp });
        }
        _ => {}
    }

    events
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped
/// so a broken event sink never interrupts a workout.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug, so Debug is implemented by hand.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
