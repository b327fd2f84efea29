//! Session engine
//!
//! Drives a fixed phase list through `Idle → Running ⇄ Paused → Finished`
//! against an injected monotonic clock. Time is never accumulated
//! incrementally: every tick recomputes the remaining time from the phase
//! start, the total time spent paused in this phase, and "now", so rounding
//! errors cannot compound and a late tick cannot skip more than one phase.

use tracing::{debug, info, trace};

use crate::workout::WorkoutDefinition;

use super::clock::{Clock, Millis, MonotonicClock};
use super::expand::{Phase, expand};
use super::snapshot::{FINISHED_LABEL, SessionSnapshot, Status};

/// State machine for one interval session.
///
/// Commands that do not apply in the current state (pausing while idle,
/// resuming while running, skipping before start, ...) are silent no-ops.
/// Every command and tick returns the freshly replaced snapshot.
///
/// The engine is single-threaded: callers must serialize all commands and
/// ticks through one execution context.
#[derive(Debug)]
pub struct SessionEngine<C: Clock = MonotonicClock> {
    phases: Vec<Phase>,
    clock: C,
    snapshot: SessionSnapshot,
    /// When the current phase began
    phase_started_at: Millis,
    /// When the pending pause began, if paused
    paused_at: Option<Millis>,
    /// Total time paused during the current phase
    paused_accum: Millis,
}

impl SessionEngine<MonotonicClock> {
    /// Creates an idle engine over `phases` using real monotonic time.
    #[must_use]
    pub fn new(phases: Vec<Phase>) -> Self {
        Self::with_clock(phases, MonotonicClock::new())
    }
}

impl<C: Clock> SessionEngine<C> {
    /// Creates an idle engine over `phases` reading time from `clock`.
    #[must_use]
    pub fn with_clock(phases: Vec<Phase>, clock: C) -> Self {
        let snapshot = SessionSnapshot::idle(&phases);
        Self {
            phases,
            clock,
            snapshot,
            phase_started_at: 0,
            paused_at: None,
            paused_accum: 0,
        }
    }

    /// Expands `def` and creates an idle engine over the result.
    #[must_use]
    pub fn for_workout(def: &WorkoutDefinition, clock: C) -> Self {
        Self::with_clock(expand(def), clock)
    }

    /// The current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// The phase list this engine runs.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// The injected clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Starts (or restarts) the session.
    ///
    /// - empty phase list or already running: no-op
    /// - paused: same as [`resume`](Self::resume)
    /// - idle or finished: begins the first phase
    pub fn start(&mut self) -> &SessionSnapshot {
        if self.phases.is_empty() {
            trace!("start ignored: no phases");
            return &self.snapshot;
        }
        match self.snapshot.status {
            Status::Running => {
                trace!("start ignored: already running");
                &self.snapshot
            }
            Status::Paused => self.resume(),
            Status::Idle | Status::Finished => {
                let now = self.clock.now_ms();
                info!(phase_count = self.phases.len(), "session started");
                self.begin_phase(0, now);
                &self.snapshot
            }
        }
    }

    /// Freezes the countdown. No-op unless running.
    pub fn pause(&mut self) -> &SessionSnapshot {
        if self.snapshot.status != Status::Running {
            trace!(status = %self.snapshot.status, "pause ignored");
            return &self.snapshot;
        }
        let now = self.clock.now_ms();
        self.paused_at = Some(now);
        self.snapshot = SessionSnapshot {
            status: Status::Paused,
            ..self.snapshot.clone()
        };
        debug!(phase_index = self.snapshot.phase_index, "session paused");
        &self.snapshot
    }

    /// Continues after [`pause`](Self::pause). No-op unless paused.
    ///
    /// The paused interval is excluded from the current phase's elapsed
    /// time, so the remaining time picks up exactly where it stopped.
    pub fn resume(&mut self) -> &SessionSnapshot {
        if self.snapshot.status != Status::Paused {
            trace!(status = %self.snapshot.status, "resume ignored");
            return &self.snapshot;
        }
        let Some(paused_at) = self.paused_at.take() else {
            trace!("resume ignored: no pause recorded");
            return &self.snapshot;
        };
        let now = self.clock.now_ms();
        let paused_for = now.saturating_sub(paused_at);
        self.paused_accum = self.paused_accum.saturating_add(paused_for);
        self.snapshot = SessionSnapshot {
            status: Status::Running,
            ..self.snapshot.clone()
        };
        debug!(
            phase_index = self.snapshot.phase_index,
            paused_ms = paused_for,
            "session resumed"
        );
        &self.snapshot
    }

    /// Returns to the idle view of the first phase. Always succeeds.
    pub fn stop(&mut self) -> &SessionSnapshot {
        self.snapshot = SessionSnapshot::idle(&self.phases);
        self.paused_at = None;
        self.paused_accum = 0;
        self.phase_started_at = 0;
        debug!("session stopped");
        &self.snapshot
    }

    /// Jumps to the next phase, finishing after the last one.
    /// No-op while idle.
    pub fn skip(&mut self) -> &SessionSnapshot {
        if self.snapshot.status == Status::Idle {
            trace!("skip ignored: session not started");
            return &self.snapshot;
        }
        let now = self.clock.now_ms();
        let next = self.snapshot.phase_index + 1;
        debug!(from = self.snapshot.phase_index, to = next, "phase skipped");
        self.begin_phase(next, now);
        &self.snapshot
    }

    /// Recomputes remaining time at `now` and advances when the current
    /// phase is over.
    ///
    /// No-op unless running. A tick at or past the phase boundary begins
    /// the next phase at `now`; further ticks then count down that phase,
    /// so late or repeated ticks never advance more than one phase each.
    pub fn tick(&mut self, now: Millis) -> &SessionSnapshot {
        if self.snapshot.status != Status::Running {
            return &self.snapshot;
        }
        let index = self.snapshot.phase_index;
        let Some(phase) = self.phases.get(index) else {
            return &self.snapshot;
        };

        let elapsed = self.elapsed_ms(now);
        let phase_done = elapsed >= phase.duration_ms();

        self.snapshot = SessionSnapshot {
            remaining_sec: ceil_secs(phase.duration_ms().saturating_sub(elapsed)),
            total_remaining_sec: self.total_remaining_sec(index, now),
            ..self.snapshot.clone()
        };

        if phase_done {
            debug!(phase_index = index, elapsed_ms = elapsed, "phase complete");
            self.begin_phase(index + 1, now);
        }
        &self.snapshot
    }

    /// [`tick`](Self::tick) at the clock's current reading.
    pub fn tick_now(&mut self) -> &SessionSnapshot {
        let now = self.clock.now_ms();
        self.tick(now)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Enters phase `index`, or the finished state past the end.
    fn begin_phase(&mut self, index: usize, now: Millis) {
        let Some(phase) = self.phases.get(index) else {
            self.paused_at = None;
            self.snapshot = SessionSnapshot {
                status: Status::Finished,
                phase_index: self.phases.len(),
                phase_count: self.phases.len(),
                label: FINISHED_LABEL.to_owned(),
                exercise_name: None,
                remaining_sec: 0,
                total_remaining_sec: 0,
                ..self.snapshot.clone()
            };
            info!("session finished");
            return;
        };

        self.phase_started_at = now;
        self.paused_accum = 0;
        self.paused_at = None;

        let snapshot = SessionSnapshot {
            status: Status::Running,
            phase_index: index,
            phase_count: self.phases.len(),
            phase_type: phase.phase_type,
            label: phase.label.clone(),
            exercise_name: phase.exercise.as_ref().map(|e| e.name().to_owned()),
            remaining_sec: u64::from(phase.duration_sec),
            total_remaining_sec: self.total_remaining_sec(index, now),
        };
        debug!(
            phase_index = index,
            phase_type = %phase.phase_type,
            duration_sec = phase.duration_sec,
            label = %phase.label,
            "phase started"
        );
        self.snapshot = snapshot;
    }

    /// Running time spent in the current phase, excluding pauses.
    const fn elapsed_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.phase_started_at)
            .saturating_sub(self.paused_accum)
    }

    /// Current phase's rounded-up remainder plus every later phase.
    fn total_remaining_sec(&self, index: usize, now: Millis) -> u64 {
        let Some(current) = self.phases.get(index) else {
            return 0;
        };
        let current_ms = current.duration_ms().saturating_sub(self.elapsed_ms(now));
        let later: u64 = self.phases[index + 1..]
            .iter()
            .map(|p| u64::from(p.duration_sec))
            .sum();
        ceil_secs(current_ms) + later
    }
}

/// Milliseconds → whole seconds, rounding up.
const fn ceil_secs(ms: Millis) -> u64 {
    ms.div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{ManualClock, PhaseType};
    use crate::workout::{TimingConfig, TimingSpec, WorkoutDefinition, sample_workout};

    fn work(sec: u32) -> Phase {
        let def = WorkoutDefinition::new(
            "w",
            TimingConfig::new(TimingSpec {
                work_sec: sec,
                sets: 1,
                ..TimingSpec::default()
            })
            .unwrap(),
            None,
        )
        .unwrap();
        expand(&def).remove(0)
    }

    fn engine(phases: Vec<Phase>) -> (SessionEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        (SessionEngine::with_clock(phases, clock.clone()), clock)
    }

    #[test]
    fn test_ceil_secs() {
        assert_eq!(ceil_secs(0), 0);
        assert_eq!(ceil_secs(1), 1);
        assert_eq!(ceil_secs(999), 1);
        assert_eq!(ceil_secs(1000), 1);
        assert_eq!(ceil_secs(1001), 2);
    }

    #[test]
    fn test_new_engine_is_idle() {
        let (e, _) = engine(vec![work(5)]);
        assert_eq!(e.snapshot().status, Status::Idle);
        assert_eq!(e.snapshot().remaining_sec, 5);
    }

    #[test]
    fn test_start_on_empty_is_noop() {
        let (mut e, _) = engine(Vec::new());
        assert_eq!(e.start().status, Status::Idle);
    }

    #[test]
    fn test_start_while_running_keeps_timing() {
        let (mut e, clock) = engine(vec![work(10)]);
        e.start();
        clock.set(4000);
        e.start();
        assert_eq!(e.tick(4000).remaining_sec, 6);
    }

    #[test]
    fn test_start_while_paused_resumes() {
        let (mut e, clock) = engine(vec![work(10)]);
        e.start();
        clock.set(2000);
        e.pause();
        clock.set(9000);
        assert_eq!(e.start().status, Status::Running);
        assert_eq!(e.tick(9000).remaining_sec, 8);
    }

    #[test]
    fn test_pause_and_resume_noops() {
        let (mut e, _) = engine(vec![work(10)]);
        assert_eq!(e.pause().status, Status::Idle);
        assert_eq!(e.resume().status, Status::Idle);
        e.start();
        assert_eq!(e.resume().status, Status::Running);
    }

    #[test]
    fn test_skip_while_idle_is_noop() {
        let (mut e, _) = engine(vec![work(10), work(10)]);
        let idle = SessionSnapshot::idle(e.phases());
        assert_eq!(e.skip(), &idle);
    }

    #[test]
    fn test_tick_ignored_unless_running() {
        let (mut e, _) = engine(vec![work(10)]);
        let before = e.snapshot().clone();
        assert_eq!(e.tick(50_000), &before);
    }

    #[test]
    fn test_remaining_rounds_up() {
        let (mut e, _) = engine(vec![work(5)]);
        e.start();
        assert_eq!(e.tick(1).remaining_sec, 5);
        assert_eq!(e.tick(999).remaining_sec, 5);
        assert_eq!(e.tick(1000).remaining_sec, 4);
        assert_eq!(e.tick(4001).remaining_sec, 1);
        assert_eq!(e.tick(4999).remaining_sec, 1);
    }

    #[test]
    fn test_tick_at_boundary_advances_once() {
        let (mut e, _) = engine(vec![work(2), work(3), work(4)]);
        e.start();
        let snap = e.tick(2000).clone();
        assert_eq!(snap.phase_index, 1);
        assert_eq!(snap.remaining_sec, 3);
        assert_eq!(snap.total_remaining_sec, 7);
        // Repeating the same reading must not advance again.
        let again = e.tick(2000).clone();
        assert_eq!(again.phase_index, 1);
        assert_eq!(again.remaining_sec, 3);
    }

    #[test]
    fn test_late_tick_advances_one_phase_only() {
        let (mut e, _) = engine(vec![work(1), work(1), work(1)]);
        e.start();
        let snap = e.tick(60_000).clone();
        assert_eq!(snap.phase_index, 1);
        assert_eq!(snap.remaining_sec, 1);
    }

    #[test]
    fn test_total_remaining_recomputed() {
        let phases = expand(&sample_workout());
        let (mut e, _) = engine(phases);
        e.start();
        assert_eq!(e.snapshot().total_remaining_sec, 320);
        let snap = e.tick(12_500).clone();
        assert_eq!(snap.remaining_sec, 8);
        assert_eq!(snap.total_remaining_sec, 308);
        assert!(snap.total_remaining_sec >= snap.remaining_sec);
    }

    #[test]
    fn test_finish_state() {
        let (mut e, _) = engine(vec![work(1)]);
        e.start();
        let snap = e.tick(1000).clone();
        assert_eq!(snap.status, Status::Finished);
        assert_eq!(snap.phase_index, snap.phase_count);
        assert_eq!(snap.label, FINISHED_LABEL);
        assert_eq!(snap.remaining_sec, 0);
        assert_eq!(snap.total_remaining_sec, 0);
        assert!(snap.exercise_name.is_none());
        // Finished is terminal for ticks.
        assert_eq!(e.tick(99_000), &snap);
    }

    #[test]
    fn test_restart_after_finish() {
        let (mut e, clock) = engine(vec![work(1), work(2)]);
        e.start();
        e.skip();
        e.skip();
        assert_eq!(e.snapshot().status, Status::Finished);
        clock.set(10_000);
        let snap = e.start().clone();
        assert_eq!(snap.status, Status::Running);
        assert_eq!(snap.phase_index, 0);
        assert_eq!(e.tick(10_500).remaining_sec, 1);
    }

    #[test]
    fn test_skip_while_paused_runs_next_phase() {
        let (mut e, clock) = engine(vec![work(5), work(5)]);
        e.start();
        clock.set(1000);
        e.pause();
        let snap = e.skip().clone();
        assert_eq!(snap.status, Status::Running);
        assert_eq!(snap.phase_index, 1);
        clock.set(3000);
        // Phase 1 began at t=1000 with no carried-over pause.
        assert_eq!(e.tick(3000).remaining_sec, 3);
    }

    #[test]
    fn test_stop_resets_everything() {
        let (mut e, clock) = engine(vec![work(5), work(5)]);
        e.start();
        clock.set(6000);
        e.tick(6000);
        e.pause();
        let snap = e.stop().clone();
        assert_eq!(snap, SessionSnapshot::idle(e.phases()));
        // Stop is always allowed, even when already idle.
        assert_eq!(e.stop(), &snap);
        // Pending pause was discarded.
        assert_eq!(e.resume().status, Status::Idle);
    }

    #[test]
    fn test_pause_accumulates_across_multiple_pauses() {
        let (mut e, clock) = engine(vec![work(10)]);
        e.start();
        clock.set(2000);
        e.pause();
        clock.set(5000);
        e.resume();
        clock.set(6000);
        e.pause();
        clock.set(20_000);
        e.resume();
        // Running time: 2s + 1s = 3s.
        assert_eq!(e.tick(20_000).remaining_sec, 7);
    }

    #[test]
    fn test_work_phase_exposes_exercise() {
        let phases = expand(&sample_workout());
        let (mut e, _) = engine(phases);
        let snap = e.start().clone();
        assert_eq!(snap.phase_type, PhaseType::Work);
        assert_eq!(snap.exercise_name.as_deref(), Some("Push-ups"));
        let rest = e.skip().clone();
        assert_eq!(rest.phase_type, PhaseType::Rest);
        assert!(rest.exercise_name.is_none());
    }
}
