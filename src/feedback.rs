//! Feedback cues derived from snapshot deltas.
//!
//! The engine emits no side effects. Beeps, vibration and keep-awake are
//! decided here by comparing each observed snapshot with what was seen
//! before; the caller maps [`Cue`]s onto whatever the platform offers.

use serde::Serialize;

use crate::phase::{PhaseType, SessionSnapshot, Status};

/// Highest remaining-seconds value that produces a countdown cue.
pub const COUNTDOWN_FROM: u64 = 3;

/// A feedback signal for the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    /// A new phase started running (short beep + vibration).
    PhaseChanged { index: usize },
    /// Final seconds of a work phase (short beep).
    Countdown { remaining_sec: u64 },
    /// Screen should (not) be kept awake.
    KeepAwake { on: bool },
}

/// Turns a stream of snapshots into cues.
///
/// - `PhaseChanged` fires when a running snapshot shows a phase index
///   other than the last one announced.
/// - `Countdown` fires for 3, 2 and 1 seconds left in a running work
///   phase, once per value; it re-arms as soon as more than three seconds
///   remain or the session leaves a running work phase.
/// - `KeepAwake` fires whenever "running or paused" flips.
#[derive(Debug, Default)]
pub struct FeedbackTracker {
    last_phase: Option<usize>,
    last_countdown: Option<u64>,
    keep_awake: bool,
}

impl FeedbackTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one snapshot and returns the cues it triggers, in order.
    pub fn observe(&mut self, snap: &SessionSnapshot) -> Vec<Cue> {
        let mut cues = Vec::new();

        let active = snap.is_active();
        if active != self.keep_awake {
            self.keep_awake = active;
            cues.push(Cue::KeepAwake { on: active });
        }

        let running = snap.status == Status::Running;
        if running && self.last_phase != Some(snap.phase_index) {
            self.last_phase = Some(snap.phase_index);
            cues.push(Cue::PhaseChanged {
                index: snap.phase_index,
            });
        }
        if snap.status == Status::Idle {
            // A restarted session announces phase 0 again.
            self.last_phase = None;
        }

        if running && snap.phase_type == PhaseType::Work {
            let r = snap.remaining_sec;
            if (1..=COUNTDOWN_FROM).contains(&r) && self.last_countdown != Some(r) {
                self.last_countdown = Some(r);
                cues.push(Cue::Countdown { remaining_sec: r });
            }
            if r > COUNTDOWN_FROM {
                self.last_countdown = None;
            }
        } else {
            self.last_countdown = None;
        }

        cues
    }
}
