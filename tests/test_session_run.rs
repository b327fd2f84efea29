mod common;

use common::{RunProcess, fixture_path};
use serde_json::Value;

fn statuses(lines: &[Value]) -> Vec<&str> {
    lines
        .iter()
        .filter_map(|l| l.get("status").and_then(Value::as_str))
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn autostart_runs_to_completion() {
    let mut proc = RunProcess::spawn(&fixture_path("quick.yaml"), &["--autostart"]);
    proc.close_stdin();

    let lines = proc.read_to_end().await;
    let seen = statuses(&lines);
    assert_eq!(seen.first(), Some(&"idle"));
    assert_eq!(seen.last(), Some(&"finished"));

    let phase_changes = lines
        .iter()
        .filter(|l| l.get("cue").and_then(Value::as_str) == Some("phase_changed"))
        .count();
    assert_eq!(phase_changes, 3);

    assert_eq!(proc.wait().await, Some(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn keyboard_commands_drive_session() {
    let mut proc = RunProcess::spawn(&fixture_path("hiit_short.yaml"), &[]);

    let idle = proc.expect_status("idle").await;
    assert_eq!(idle["remaining_sec"], 20);
    assert_eq!(idle["total_remaining_sec"], 320);

    proc.send("s").await;
    let running = proc.expect_status("running").await;
    assert_eq!(running["phase_index"], 0);
    assert_eq!(running["exercise_name"], "Push-ups");

    proc.send("p").await;
    proc.expect_status("paused").await;

    proc.send("n").await;
    let skipped = proc.expect_status("running").await;
    assert_eq!(skipped["phase_index"], 1);
    assert_eq!(skipped["label"], "Set rest");

    proc.send("x").await;
    let stopped = proc.expect_status("idle").await;
    assert_eq!(stopped["phase_index"], 0);

    proc.send("q").await;
    assert_eq!(proc.wait().await, Some(0));
}

#[tokio::test(flavor = "multi_thread")]
async fn events_file_records_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    let mut proc = RunProcess::spawn(
        &fixture_path("quick.yaml"),
        &["--autostart", "--events", events.to_str().unwrap()],
    );
    proc.close_stdin();
    proc.read_to_end().await;
    assert_eq!(proc.wait().await, Some(0));

    let content = std::fs::read_to_string(&events).unwrap();
    let records: Vec<Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let types: Vec<&str> = records.iter().map(|r| r["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec![
            "SessionStarted",
            "PhaseEntered",
            "PhaseEntered",
            "PhaseEntered",
            "SessionFinished",
            "RunEnded",
        ]
    );
    let sequences: Vec<u64> = records.iter().map(|r| r["sequence"].as_u64().unwrap()).collect();
    assert_eq!(sequences, (0..6).collect::<Vec<_>>());
    assert_eq!(records[5]["reason"], "completed");
}
