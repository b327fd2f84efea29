//! Human-readable terminal rendering.

use std::fmt::Write as _;

use crate::phase::{Phase, SessionSnapshot, Status};
use crate::workout::{WorkoutDefinition, format_duration};

fn clock(sec: u64) -> String {
    format_duration(i64::try_from(sec).unwrap_or(i64::MAX))
}

/// One status line for a session snapshot.
///
/// ```text
/// [running] 1/7 WORK Set 1/4 · Rep 1/1 (Push-ups)  00:20  total 05:20
/// ```
#[must_use]
pub fn snapshot_line(snap: &SessionSnapshot) -> String {
    if snap.status == Status::Finished {
        return format!("[{}] {}", snap.status, snap.label);
    }
    let mut line = format!(
        "[{}] {}/{} {} {}",
        snap.status,
        snap.phase_index + 1,
        snap.phase_count,
        snap.phase_type,
        snap.label,
    );
    if let Some(name) = &snap.exercise_name {
        let _ = write!(line, " ({name})");
    }
    let _ = write!(
        line,
        "  {}  total {}",
        clock(snap.remaining_sec),
        clock(snap.total_remaining_sec)
    );
    line
}

/// One summary line for a saved workout.
#[must_use]
pub fn workout_line(def: &WorkoutDefinition) -> String {
    let t = def.timing();
    let exercise = def.exercise().map_or("-", |e| e.name());
    format!(
        "{}  {}  {}x{} @ {}  {}  {}",
        def.id(),
        def.title(),
        t.sets(),
        t.reps_per_set(),
        format_duration(i64::from(t.work_sec())),
        exercise,
        t.total_duration_sec().map_or_else(|| "--:--".to_owned(), clock),
    )
}

/// A numbered phase table with start offsets.
#[must_use]
pub fn plan_table(def: &WorkoutDefinition, phases: &[Phase]) -> String {
    let mut out = format!("{} ({} phases)\n", def.title(), phases.len());
    let mut offset = 0_u64;
    for (i, phase) in phases.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {}  {:<8}  {:>5}  {}",
            i + 1,
            clock(offset),
            phase.phase_type.to_string(),
            format_duration(i64::from(phase.duration_sec)),
            phase.label,
        );
        offset += u64::from(phase.duration_sec);
    }
    let _ = writeln!(out, "total {}", clock(offset));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::expand;
    use crate::workout::{TimingConfig, TimingSpec, sample_workout};

    #[test]
    fn idle_line_shows_first_phase() {
        let phases = expand(&sample_workout());
        let line = snapshot_line(&SessionSnapshot::idle(&phases));
        assert_eq!(
            line,
            "[idle] 1/7 WORK Set 1/4 · Rep 1/1 (Push-ups)  00:20  total 05:20"
        );
    }

    #[test]
    fn finished_line_is_short() {
        let snap = SessionSnapshot {
            status: Status::Finished,
            label: "Finished".into(),
            ..SessionSnapshot::default()
        };
        assert_eq!(snapshot_line(&snap), "[finished] Finished");
    }

    #[test]
    fn plan_lists_offsets_and_total() {
        let def = sample_workout();
        let table = plan_table(&def, &expand(&def));
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "HIIT short (7 phases)");
        assert!(lines[2].contains("00:20"));
        assert!(lines[2].contains("Set rest"));
        assert_eq!(lines.last().copied(), Some("total 05:20"));
    }

    #[test]
    fn workout_line_survives_oversized_timing() {
        let timing = TimingConfig::new(TimingSpec {
            work_sec: u32::MAX,
            reps_per_set: 100_000,
            sets: 100_000,
            ..TimingSpec::default()
        })
        .unwrap();
        let def = WorkoutDefinition::with_id("big", "Big", timing, None).unwrap();
        assert!(workout_line(&def).ends_with("--:--"));
    }

    #[test]
    fn workout_line_summarizes() {
        let line = workout_line(&sample_workout());
        assert!(line.contains("HIIT short  4x1 @ 00:20  Push-ups  05:20"));
    }
}
