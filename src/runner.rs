//! Session runner
//!
//! Drives a [`SessionEngine`] from a tokio task: ticks it on a fixed
//! interval, applies commands arriving on a channel, and publishes every
//! snapshot that differs from the previous one. Lifecycle [`Event`]s are
//! derived from the same snapshot deltas and written to an
//! [`EventEmitter`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::observability::{Event, EventEmitter, RunSummary, StopReason, events_between};
use crate::phase::{Clock, MonotonicClock, SessionEngine, SessionSnapshot};

/// Default tick period. Fine enough that whole-second countdowns update
/// promptly, coarse enough to be cheap.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// A user command for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerCommand {
    Start,
    Pause,
    Resume,
    Skip,
    Stop,
    /// Ends the runner loop.
    Quit,
}

impl RunnerCommand {
    /// Maps a one-letter keyboard command to a [`RunnerCommand`].
    ///
    /// `s` start, `p` pause, `r` resume, `n` next, `x` stop, `q` quit.
    #[must_use]
    pub fn from_key(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "s" | "start" => Some(Self::Start),
            "p" | "pause" => Some(Self::Pause),
            "r" | "resume" => Some(Self::Resume),
            "n" | "next" | "skip" => Some(Self::Skip),
            "x" | "stop" => Some(Self::Stop),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Why the loop exited.
    pub reason: StopReason,
    /// Counters gathered from emitted events.
    pub summary: RunSummary,
    /// The last published snapshot.
    pub last: SessionSnapshot,
}

/// Tokio driver around a [`SessionEngine`].
pub struct SessionRunner<C: Clock = MonotonicClock> {
    engine: SessionEngine<C>,
    commands: mpsc::Receiver<RunnerCommand>,
    snapshots: mpsc::UnboundedSender<SessionSnapshot>,
    events: Arc<EventEmitter>,
    cancel: CancellationToken,
    tick: Duration,
    exit_on_finish: bool,
}

impl<C: Clock> SessionRunner<C> {
    /// Creates a runner with a silent event sink, a fresh cancellation
    /// token and the default tick.
    #[must_use]
    pub fn new(
        engine: SessionEngine<C>,
        commands: mpsc::Receiver<RunnerCommand>,
        snapshots: mpsc::UnboundedSender<SessionSnapshot>,
    ) -> Self {
        Self {
            engine,
            commands,
            snapshots,
            events: Arc::new(EventEmitter::noop()),
            cancel: CancellationToken::new(),
            tick: DEFAULT_TICK,
            exit_on_finish: false,
        }
    }

    /// Routes lifecycle events to `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = events;
        self
    }

    /// Stops the runner when `cancel` fires.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Overrides the tick period.
    #[must_use]
    pub const fn tick_every(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Ends the loop as soon as the session finishes.
    #[must_use]
    pub const fn exit_on_finish(mut self, exit: bool) -> Self {
        self.exit_on_finish = exit;
        self
    }

    /// Runs until cancelled, told to quit, or (optionally) finished.
    ///
    /// The initial snapshot is published before the first tick. When the
    /// command channel closes the runner keeps ticking an active session
    /// to its end, and quits right away otherwise.
    pub async fn run(mut self) -> RunOutcome {
        let started = Instant::now();
        let mut interval = tokio::time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut summary = RunSummary::default();
        let mut last = self.engine.snapshot().clone();
        let _ = self.snapshots.send(last.clone());
        let mut commands_open = true;

        let reason = loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => {
                    debug!("runner cancelled");
                    break StopReason::Interrupted;
                }

                cmd = self.commands.recv(), if commands_open => match cmd {
                    Some(RunnerCommand::Quit) => break StopReason::Quit,
                    Some(cmd) => self.apply(cmd),
                    None => {
                        debug!("command channel closed");
                        commands_open = false;
                    }
                },

                _ = interval.tick() => {
                    self.engine.tick_now();
                }
            }

            self.publish(&mut last, &mut summary);

            if self.exit_on_finish && last.is_finished() {
                break StopReason::Completed;
            }
            if !commands_open && !last.is_active() {
                break if last.is_finished() {
                    StopReason::Completed
                } else {
                    StopReason::Quit
                };
            }
        };

        summary.elapsed_secs = started.elapsed().as_secs_f64();
        info!(reason = ?reason, %summary, "run ended");
        self.events.emit(Event::RunEnded {
            timestamp: Utc::now(),
            reason,
            summary: summary.clone(),
        });

        RunOutcome {
            reason,
            summary,
            last,
        }
    }

    fn apply(&mut self, cmd: RunnerCommand) {
        debug!(?cmd, "applying command");
        match cmd {
            RunnerCommand::Start => self.engine.start(),
            RunnerCommand::Pause => self.engine.pause(),
            RunnerCommand::Resume => self.engine.resume(),
            RunnerCommand::Skip => self.engine.skip(),
            RunnerCommand::Stop => self.engine.stop(),
            RunnerCommand::Quit => self.engine.snapshot(),
        };
    }

    /// Sends the engine's snapshot if it changed, with its events.
    fn publish(&self, last: &mut SessionSnapshot, summary: &mut RunSummary) {
        let next = self.engine.snapshot();
        if next == last {
            return;
        }
        for event in events_between(last, next, Utc::now()) {
            summary.record(&event);
            self.events.emit(event);
        }
        let _ = self.snapshots.send(next.clone());
        last.clone_from(next);
    }
}

impl<C: Clock> std::fmt::Debug for SessionRunner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRunner")
            .field("snapshot", self.engine.snapshot())
            .field("tick", &self.tick)
            .field("exit_on_finish", &self.exit_on_finish)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Status, expand};
    use crate::workout::sample_workout;

    struct Harness {
        commands: mpsc::Sender<RunnerCommand>,
        snapshots: mpsc::UnboundedReceiver<SessionSnapshot>,
        cancel: CancellationToken,
        handle: tokio::task::JoinHandle<RunOutcome>,
    }

    fn spawn(exit_on_finish: bool) -> Harness {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (snap_tx, snap_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let engine = SessionEngine::new(expand(&sample_workout()));
        let runner = SessionRunner::new(engine, cmd_rx, snap_tx)
            .with_cancel(cancel.clone())
            .exit_on_finish(exit_on_finish);
        Harness {
            commands: cmd_tx,
            snapshots: snap_rx,
            cancel,
            handle: tokio::spawn(runner.run()),
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SessionSnapshot>) -> Vec<SessionSnapshot> {
        let mut out = Vec::new();
        while let Ok(s) = rx.try_recv() {
            out.push(s);
        }
        out
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(RunnerCommand::from_key("s"), Some(RunnerCommand::Start));
        assert_eq!(RunnerCommand::from_key(" P \n"), Some(RunnerCommand::Pause));
        assert_eq!(RunnerCommand::from_key("next"), Some(RunnerCommand::Skip));
        assert_eq!(RunnerCommand::from_key("x"), Some(RunnerCommand::Stop));
        assert_eq!(RunnerCommand::from_key("?"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_sample_workout_to_completion() {
        let mut h = spawn(true);
        h.commands.send(RunnerCommand::Start).await.unwrap();

        let outcome = h.handle.await.unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert_eq!(outcome.last.status, Status::Finished);
        assert_eq!(outcome.summary.phases_entered, 7);
        assert!(outcome.summary.finished);
        assert!(outcome.summary.elapsed_secs >= 320.0);

        let snaps = drain(&mut h.snapshots);
        assert_eq!(snaps.first().map(|s| s.status), Some(Status::Idle));
        assert_eq!(snaps.last().map(|s| s.status), Some(Status::Finished));
        // Only changes are published: no two consecutive snapshots are equal.
        assert!(snaps.windows(2).all(|w| w[0] != w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_published_countdown() {
        let mut h = spawn(false);
        h.commands.send(RunnerCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5_050)).await;
        h.commands.send(RunnerCommand::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        let snaps = drain(&mut h.snapshots);
        let last = snaps.last().unwrap();
        assert_eq!(last.status, Status::Paused);
        assert_eq!(last.phase_index, 0);
        assert_eq!(last.remaining_sec, 15);

        h.commands.send(RunnerCommand::Resume).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        let last = drain(&mut h.snapshots).pop().unwrap();
        assert_eq!(last.status, Status::Running);
        assert_eq!(last.remaining_sec, 14);

        h.commands.send(RunnerCommand::Quit).await.unwrap();
        let outcome = h.handle.await.unwrap();
        assert_eq!(outcome.reason, StopReason::Quit);
        assert_eq!(outcome.summary.pauses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts() {
        let h = spawn(false);
        h.commands.send(RunnerCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;
        h.cancel.cancel();
        let outcome = h.handle.await.unwrap();
        assert_eq!(outcome.reason, StopReason::Interrupted);
        assert_eq!(outcome.last.status, Status::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_runs_active_session_out() {
        let h = spawn(false);
        h.commands.send(RunnerCommand::Start).await.unwrap();
        drop(h.commands);
        let outcome = h.handle.await.unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert!(outcome.last.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_while_idle_quits() {
        let h = spawn(false);
        drop(h.commands);
        let outcome = h.handle.await.unwrap();
        assert_eq!(outcome.reason, StopReason::Quit);
        assert_eq!(outcome.last.status, Status::Idle);
    }
}
