//! Shared test utilities for jobtrack integration tests.
//!
//! `TestHarness` gives each test its own temp directory holding a
//! file-backed database and, when needed, a config file.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use jobtrack::config::Config;
use jobtrack::{Database, JobService, LocalJobsApi, Tracker};

pub struct TestHarness {
    temp_dir: TempDir,
    /// SQLite file inside the temp directory. Not created until opened.
    pub db_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("jobtrack.db");
        Self { temp_dir, db_path }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Opens (or reopens) the harness database.
    pub fn open_database(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to open test database")
    }

    pub fn service(&self) -> JobService {
        JobService::new(self.open_database())
    }

    /// A tracker wired straight to the harness database.
    pub fn tracker(&self) -> Tracker<LocalJobsApi> {
        Tracker::new(LocalJobsApi::new(self.service()))
    }

    /// Writes `config` as JSON and returns its path.
    pub fn write_config(&self, filename: &str, config: &Config) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    pub fn write_raw_config(&self, filename: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }
}

/// In-memory tracker for tests that do not care about the file.
pub fn memory_tracker() -> Tracker<LocalJobsApi> {
    let db = Database::open_in_memory().expect("Failed to create test database");
    Tracker::new(LocalJobsApi::new(JobService::new(db)))
}
