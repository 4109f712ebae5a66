//! Common test utilities for CLI integration tests.
//!
//! Every [`TestEnv`] gets its own data directory and working directory, so
//! no `tabling.yaml` or `TABLING_*` variable from the host leaks in.

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables the binary reads; cleared for every command.
const TABLING_VARS: &[&str] = &[
    "TABLING_DATA_DIR",
    "TABLING_BUSY_TIMEOUT",
    "TABLING_DISABLE_AUTOINIT",
    "TABLING_DEFAULT_VISIT_MINUTES",
    "TABLING_TURNOVER_BUFFER_MINUTES",
    "TABLING_ENFORCE_CAPACITY",
    "TABLING_MAXIMUM_LOCK_WAIT_SECONDS",
    "TABLING_OUTPUT_FORMAT",
];

/// Test environment with an isolated data directory.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Working directory for commands
    pub temp_path: PathBuf,
    /// Data directory (created on first use)
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("tabling-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// The binary with a clean environment and no `--data-dir`.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("tabling").expect("Failed to find tabling binary");
        for var in TABLING_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.temp_path);
        cmd
    }

    /// The binary pointed at this environment's data directory.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the working directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    pub fn add_table(&self, id: u32, capacity: u16) {
        self.command()
            .args(["table", "add", "--id", &id.to_string(), "--name"])
            .arg(format!("T{id}"))
            .args(["--capacity", &capacity.to_string()])
            .assert()
            .success();
    }

    /// Seed tables `1..=count`, four seats each.
    pub fn floor(&self, count: u32) {
        for id in 1..=count {
            self.add_table(id, 4);
        }
    }

    /// Book `table` (plus `linked`) at `at` and return the reservation id.
    pub fn book(&self, table: u32, linked: &[u32], party: u16, at: &str) -> i64 {
        let mut cmd = self.command();
        cmd.args(["book", "--table", &table.to_string()]);
        for id in linked {
            cmd.args(["--link", &id.to_string()]);
        }
        let output = cmd
            .args(["--party", &party.to_string(), "--at", at, "--guest", "Okafor"])
            .output()
            .expect("Failed to run book");

        assert!(
            output.status.success(),
            "book failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("Output is not a reservation id")
    }

    /// Run a lifecycle command (`confirm`, `seat`, ...) that must succeed.
    pub fn transition(&self, command: &str, id: i64) {
        self.command()
            .args([command, &id.to_string()])
            .assert()
            .success();
    }

    /// Open an order on `table` and return its id.
    pub fn open_order(&self, table: u32) -> i64 {
        let output = self
            .command()
            .args(["order", "open", "--table", &table.to_string()])
            .output()
            .expect("Failed to run order open");
        assert!(
            output.status.success(),
            "order open failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("Output is not an order id")
    }

    /// `table list --format json`, parsed.
    pub fn tables_json(&self) -> Vec<Value> {
        self.json(&["table", "list", "--format", "json"])
    }

    /// Status of one table as listed.
    pub fn table_status(&self, id: u32) -> String {
        self.tables_json()
            .into_iter()
            .find(|t| t["id"] == id)
            .and_then(|t| t["status"].as_str().map(str::to_string))
            .unwrap_or_else(|| panic!("table {id} not listed"))
    }

    /// Run a command expected to print a JSON array.
    pub fn json(&self, args: &[&str]) -> Vec<Value> {
        let output = self.command().args(args).output().expect("Failed to run");
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("Output is not JSON")
    }
}
