//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Booking fixtures

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// A Saturday, on the default schedule.
pub const SATURDAY: &str = "2024-06-08";

/// The Tuesday after [`SATURDAY`].
pub const TUESDAY: &str = "2024-06-11";

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the busbook data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; busbook creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("busbook-data");

        Self { temp_dir, data_dir }
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("busbook").expect("Failed to find busbook binary");
        cmd.env_remove("BUSBOOK_DATA_DIR")
            .env_remove("BUSBOOK_OUTPUT_FORMAT")
            .env_remove("BUSBOOK_ALLOWED_WEEKDAYS")
            .env_remove("BUSBOOK_NOTIFICATIONS")
            .env_remove("BUSBOOK_DISABLE_AUTOINIT");
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Path to the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("busbook.db")
    }

    /// Book `seat` on `date` for `email` with a full set of passenger details.
    ///
    /// # Panics
    /// Panics if the booking fails.
    pub fn book(&self, email: &str, seat: u16, date: &str) {
        self.command()
            .args(["book", "--seat", &seat.to_string(), "--email", email])
            .args(["--name", "Nimal Perera", "--phone", "0771234567"])
            .args(["--enrollment", "D/BCS/23/0001", "--role", "student"])
            .args(["--destination", "beliatta", "--date", date])
            .assert()
            .success();
    }

    /// Run `list --format json` and parse the result.
    pub fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self
            .command()
            .args(["--format", "json", "list"])
            .output()
            .expect("Failed to run list command");
        assert!(
            output.status.success(),
            "List failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("List output is not a JSON array")
    }
}
