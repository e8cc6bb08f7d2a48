//! Scheduler configuration: watched directories, storage target, interval.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a scheduler run.
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Storage target for imported rows.
    pub db_path: PathBuf,
    /// Inbox polled for `.csv` / `.xlsx` files.
    pub drop_dir: PathBuf,
    /// Destination for successfully imported files.
    pub processed_dir: PathBuf,
    /// Destination for failed files and their error logs.
    pub failed_dir: PathBuf,
    /// Wall-clock time between scans.
    pub interval: Duration,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/app.db"),
            drop_dir: PathBuf::from("./data/drop"),
            processed_dir: PathBuf::from("./data/processed"),
            failed_dir: PathBuf::from("./data/failed"),
            interval: Duration::from_secs(60),
        }
    }
}

impl SentinelConfig {
    /// Create drop/processed/failed directories if absent.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.drop_dir)?;
        std::fs::create_dir_all(&self.processed_dir)?;
        std::fs::create_dir_all(&self.failed_dir)?;
        Ok(())
    }

    /// The scheduler's append-only activity log, next to the drop folder.
    pub fn log_path(&self) -> PathBuf {
        self.drop_dir
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("scheduler.log")
    }
}
