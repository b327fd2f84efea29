//! Shared integration-test harness for spawning the `interval-trainer`
//! binary against fixture documents and throwaway libraries.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

/// Default timeout for reading a single line from the runner.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Path of the compiled binary under test.
pub const BIN: &str = env!("CARGO_BIN_EXE_interval-trainer");

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A temporary library file; removed with its directory on drop.
pub struct TempLibrary {
    dir: tempfile::TempDir,
}

impl TempLibrary {
    #[allow(clippy::missing_panics_doc)]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("workouts.json")
    }

    /// Runs a one-shot command with this library selected via the
    /// environment.
    #[allow(clippy::missing_panics_doc)]
    pub fn command(&self, args: &[&str]) -> Output {
        std::process::Command::new(BIN)
            .args(args)
            .env("INTERVAL_TRAINER_LIBRARY", self.path())
            .env_remove("INTERVAL_TRAINER_LOG_LEVEL")
            .env_remove("INTERVAL_TRAINER_MAX_PHASES")
            .stdin(std::process::Stdio::null())
            .output()
            .expect("failed to run interval-trainer")
    }
}

/// Runs a one-shot command with a throwaway library.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    TempLibrary::new().command(args)
}

/// Standard output as a lossy UTF-8 string.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Standard error as a lossy UTF-8 string.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A running `interval-trainer run` process driven over stdin, emitting
/// JSON lines on stdout.
///
/// The child process is killed on drop via `kill_on_drop(true)`.
pub struct RunProcess {
    child: Child,
    stdin: Option<tokio::process::ChildStdin>,
    reader: BufReader<tokio::process::ChildStdout>,
}

impl RunProcess {
    /// Spawns `run --format json` on the given workout document.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn(workout: &Path, extra: &[&str]) -> Self {
        let mut child = Command::new(BIN)
            .args([
                "run",
                "--workout",
                workout.to_str().expect("non-UTF-8 workout path"),
                "--format",
                "json",
                "--tick-ms",
                "20",
                "--quiet",
            ])
            .args(extra)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn interval-trainer");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Self {
            child,
            stdin: Some(stdin),
            reader: BufReader::new(stdout),
        }
    }

    /// Sends one command line.
    #[allow(clippy::missing_panics_doc)]
    pub async fn send(&mut self, key: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin
            .write_all(format!("{key}\n").as_bytes())
            .await
            .expect("failed to write to stdin");
        stdin.flush().await.expect("failed to flush stdin");
    }

    /// Closes stdin, signalling that no more commands will come.
    pub fn close_stdin(&mut self) {
        self.stdin.take();
    }

    /// Reads one JSON line, or `None` at EOF.
    #[allow(clippy::missing_panics_doc)]
    pub async fn read_json(&mut self, timeout: Duration) -> Option<Value> {
        let mut line = String::new();
        tokio::time::timeout(timeout, async {
            loop {
                line.clear();
                let n = self
                    .reader
                    .read_line(&mut line)
                    .await
                    .expect("read_line I/O error");
                if n == 0 {
                    return None;
                }
                let trimmed = line.trim_matches(|c: char| c.is_whitespace() || c == '\x07');
                if !trimmed.is_empty() {
                    return Some(
                        serde_json::from_str::<Value>(trimmed)
                            .unwrap_or_else(|e| panic!("invalid JSON line {trimmed:?}: {e}")),
                    );
                }
            }
        })
        .await
        .expect("timed out waiting for output")
    }

    /// Reads snapshot lines until one has `status`, skipping cue lines.
    #[allow(clippy::missing_panics_doc)]
    pub async fn expect_status(&mut self, status: &str) -> Value {
        loop {
            let msg = self
                .read_json(DEFAULT_TIMEOUT)
                .await
                .unwrap_or_else(|| panic!("EOF before status {status}"));
            if msg.get("status").and_then(Value::as_str) == Some(status) {
                return msg;
            }
        }
    }

    /// Reads everything until EOF.
    pub async fn read_to_end(&mut self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Some(v) = self.read_json(Duration::from_secs(15)).await {
            out.push(v);
        }
        out
    }

    /// Waits for the process to exit and returns its exit code.
    #[allow(clippy::missing_panics_doc)]
    pub async fn wait(mut self) -> Option<i32> {
        self.stdin.take();
        let status = tokio::time::timeout(Duration::from_secs(10), self.child.wait())
            .await
            .expect("process did not exit")
            .expect("wait failed");
        status.code()
    }
}
