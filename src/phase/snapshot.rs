//! Session snapshot
//!
//! The complete, point-in-time view of a running session handed to
//! presentation and feedback code. The engine never edits a snapshot in
//! place; every command and tick produces a new one.

use serde::Serialize;

use super::expand::{Phase, PhaseType, total_duration_sec};

/// Label shown once every phase has completed.
pub const FINISHED_LABEL: &str = "Finished";

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Running,
    Paused,
    Finished,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// What a session looks like right now.
///
/// Invariants:
/// - `phase_index <= phase_count`, with equality exactly when
///   `status == Finished`
/// - `total_remaining_sec >= remaining_sec`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    pub status: Status,
    pub phase_index: usize,
    pub phase_count: usize,
    pub phase_type: PhaseType,
    pub label: String,
    /// Exercise of the current phase (work phases only).
    pub exercise_name: Option<String>,
    /// Whole seconds left in the current phase, rounded up.
    pub remaining_sec: u64,
    /// Whole seconds left in the session, rounded up.
    pub total_remaining_sec: u64,
}

impl SessionSnapshot {
    /// The not-yet-started view: first phase at full length.
    ///
    /// An empty phase list yields a work-typed, unlabeled, zero-length
    /// snapshot.
    #[must_use]
    pub fn idle(phases: &[Phase]) -> Self {
        let first = phases.first();
        Self {
            status: Status::Idle,
            phase_index: 0,
            phase_count: phases.len(),
            phase_type: first.map_or(PhaseType::Work, |p| p.phase_type),
            label: first.map(|p| p.label.clone()).unwrap_or_default(),
            exercise_name: first
                .and_then(|p| p.exercise.as_ref())
                .map(|e| e.name().to_owned()),
            remaining_sec: first.map_or(0, |p| u64::from(p.duration_sec)),
            total_remaining_sec: total_duration_sec(phases),
        }
    }

    /// `true` while the session holds the screen: running or paused.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, Status::Running | Status::Paused)
    }

    /// `true` once every phase has completed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.status, Status::Finished)
    }
}
