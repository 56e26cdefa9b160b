#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

/// Runs the `cadence` binary against a throwaway database
pub struct CliTestHarness {
    temp_dir: TempDir,
    db_path: PathBuf,
}

impl CliTestHarness {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");

        Self { temp_dir, db_path }
    }

    /// A command pointed at this harness's database. The working directory is
    /// the temp dir so no stray `cadence.toml` is picked up.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
        cmd.current_dir(self.temp_dir.path())
            .env("CADENCE_DATABASE_PATH", &self.db_path)
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().success()
    }

    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command().args(args).assert().failure()
    }

    /// Runs `range --json` and parses the day groups
    pub fn range_json(&self, start: &str, end: &str) -> Vec<Value> {
        let output = self
            .command()
            .args(["range", start, end, "--json"])
            .output()
            .expect("Failed to run range");
        assert!(output.status.success(), "range failed: {:?}", output);
        serde_json::from_slice::<Value>(&output.stdout)
            .expect("range --json printed invalid JSON")
            .as_array()
            .cloned()
            .unwrap_or_default()
    }

    /// Every date in the range that carries an event, in order
    pub fn dates_in_range(&self, start: &str, end: &str) -> Vec<String> {
        self.range_json(start, end)
            .iter()
            .map(|day| day["date"].as_str().unwrap().to_string())
            .collect()
    }

    /// The action id of the first event in the range
    pub fn first_action_id(&self, start: &str, end: &str) -> String {
        let days = self.range_json(start, end);
        days[0]["events"][0]["actionId"].as_str().unwrap().to_string()
    }
}
