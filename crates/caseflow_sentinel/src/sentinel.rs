//! Scan cycle and poll loop.
//!
//! The import decision and its side effects are kept apart: an attempt yields
//! an [`ImportOutcome`], and routing turns that into filesystem moves plus a
//! final [`FileOutcome`]. Each file reaches a terminal state within one cycle;
//! a failed file is moved out of the drop folder and never retried.

use crate::config::SentinelConfig;
use caseflow_ingest::import_template_into;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Result of one import attempt, before any file movement.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Processed { rows: u64 },
    Failed { error: String },
}

/// Terminal state of one dropped file after routing.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Imported and moved into the processed directory.
    Processed { rows: u64, dest: PathBuf },
    /// Import failed; moved into the failed directory with an error log.
    Failed {
        error: String,
        dest: PathBuf,
        error_log: PathBuf,
    },
    /// Unsupported extension; logged and left in place.
    Skipped,
}

/// Extensions the scheduler will attempt to import.
pub fn supported_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("csv") {
        Some("csv")
    } else if ext.eq_ignore_ascii_case("xlsx") {
        Some("xlsx")
    } else {
        None
    }
}

/// `<stem>_<UTC timestamp>` rename applied on every move out of the drop dir.
pub fn timestamped_name(path: &Path, now: DateTime<Utc>) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dropped");
    format!("{}_{}", stem, now.format("%Y%m%d%H%M%S"))
}

/// Run the importer against one file. Never panics, never moves anything.
pub async fn attempt_import(path: &Path, db_path: &Path) -> ImportOutcome {
    match import_template_into(path, db_path).await {
        Ok(rows) => ImportOutcome::Processed { rows },
        Err(err) => ImportOutcome::Failed {
            error: err.to_string(),
        },
    }
}

/// Apply the side effects for one import outcome: move the file to its
/// terminal directory and, on failure, write the sibling error log.
pub fn route_file(
    path: &Path,
    outcome: &ImportOutcome,
    config: &SentinelConfig,
    now: DateTime<Utc>,
) -> std::io::Result<FileOutcome> {
    let base = timestamped_name(path, now);
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match outcome {
        ImportOutcome::Processed { rows } => {
            let dest = config.processed_dir.join(format!("{base}.{ext}"));
            move_file(path, &dest)?;
            Ok(FileOutcome::Processed { rows: *rows, dest })
        }
        ImportOutcome::Failed { error } => {
            let dest = config.failed_dir.join(format!("{base}.{ext}"));
            move_file(path, &dest)?;
            let error_log = config.failed_dir.join(format!("{base}.log"));
            fs::write(&error_log, error)?;
            Ok(FileOutcome::Failed {
                error: error.clone(),
                dest,
                error_log,
            })
        }
    }
}

/// Rename, falling back to copy+delete for cross-filesystem moves.
fn move_file(src: &Path, dest: &Path) -> std::io::Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    fs::copy(src, dest)?;
    fs::remove_file(src)
}

/// One synchronous pass over the drop directory.
///
/// Files are processed strictly one at a time, in directory-listing order
/// (which is not guaranteed sorted). A failed move leaves the file in place
/// for the next cycle rather than aborting the scan.
pub async fn scan_cycle(config: &SentinelConfig) -> anyhow::Result<Vec<(PathBuf, FileOutcome)>> {
    let mut results = Vec::new();

    for entry in fs::read_dir(&config.drop_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if supported_extension(&path).is_none() {
            info!(file = %path.display(), "Skipping unsupported file type");
            results.push((path, FileOutcome::Skipped));
            continue;
        }

        info!(file = %path.display(), "Processing file");
        let outcome = attempt_import(&path, &config.db_path).await;

        match route_file(&path, &outcome, config, Utc::now()) {
            Ok(file_outcome) => {
                match &file_outcome {
                    FileOutcome::Processed { rows, dest } => {
                        info!(rows, dest = %dest.display(), "Imported and moved to processed");
                    }
                    FileOutcome::Failed { error, dest, .. } => {
                        warn!(error = %error, dest = %dest.display(), "Import failed, moved to failed");
                    }
                    FileOutcome::Skipped => {}
                }
                results.push((path, file_outcome));
            }
            Err(err) => {
                error!(file = %path.display(), error = %err, "Could not move file, leaving in place");
            }
        }
    }

    Ok(results)
}

/// Run the scheduler: one scan immediately, then one per interval, until
/// interrupted.
pub async fn run(config: SentinelConfig) -> anyhow::Result<()> {
    config.ensure_dirs()?;
    info!(
        drop = %config.drop_dir.display(),
        interval_secs = config.interval.as_secs(),
        "Starting scheduler"
    );

    if let Err(err) = scan_cycle(&config).await {
        error!(error = %err, "Scan cycle failed");
    }

    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and the startup scan already ran.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = scan_cycle(&config).await {
                    error!(error = %err, "Scan cycle failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Scheduler stopped by user");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseflow_db::CaseDb;
    use std::time::Duration;
    use tempfile::TempDir;

    const VALID_CSV: &str = "\
date,complainant,accused,offences,subject,court_heard_in,submitted
2025-11-24,Alice,Bob,Theft,Case A,Magistrates Court,yes
2025-11-25,Carol,Dan,Fraud,Case B,High Court,no
";

    fn test_config(tmp: &TempDir) -> SentinelConfig {
        let config = SentinelConfig {
            db_path: tmp.path().join("app.db"),
            drop_dir: tmp.path().join("drop"),
            processed_dir: tmp.path().join("processed"),
            failed_dir: tmp.path().join("failed"),
            interval: Duration::from_secs(60),
        };
        config.ensure_dirs().unwrap();
        config
    }

    fn dir_entries(dir: &Path) -> Vec<PathBuf> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn extension_filter() {
        assert_eq!(supported_extension(Path::new("a.csv")), Some("csv"));
        assert_eq!(supported_extension(Path::new("a.XLSX")), Some("xlsx"));
        assert_eq!(supported_extension(Path::new("a.txt")), None);
        assert_eq!(supported_extension(Path::new("nosuffix")), None);
    }

    #[test]
    fn timestamped_rename_scheme() {
        let now = DateTime::parse_from_rfc3339("2025-11-24T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            timestamped_name(Path::new("/drop/filled.csv"), now),
            "filled_20251124103000"
        );
    }

    #[tokio::test]
    async fn valid_dropped_file_is_processed() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        fs::write(config.drop_dir.join("filled.csv"), VALID_CSV).unwrap();

        let results = scan_cycle(&config).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].1, FileOutcome::Processed { rows: 2, .. }));

        // Gone from the drop dir, renamed into processed.
        assert!(dir_entries(&config.drop_dir).is_empty());
        let processed = dir_entries(&config.processed_dir);
        assert_eq!(processed.len(), 1);
        let name = processed[0].file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("filled_") && name.ends_with(".csv"), "{name}");

        let db = CaseDb::open_existing(&config.db_path).await.unwrap();
        assert_eq!(db.case_count().await.unwrap(), 2);
        db.close().await;
    }

    #[tokio::test]
    async fn invalid_dropped_file_is_failed_with_log() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        // Missing the `accused` column.
        fs::write(
            config.drop_dir.join("broken.csv"),
            "date,complainant,offences,subject,court_heard_in,submitted\n\
             2025-11-24,Alice,Theft,Case A,High Court,yes\n",
        )
        .unwrap();

        let results = scan_cycle(&config).await.unwrap();
        assert!(matches!(results[0].1, FileOutcome::Failed { .. }));

        assert!(dir_entries(&config.drop_dir).is_empty());
        let failed = dir_entries(&config.failed_dir);
        assert_eq!(failed.len(), 2);

        let log = failed
            .iter()
            .find(|p| p.extension().is_some_and(|e| e == "log"))
            .unwrap();
        let text = fs::read_to_string(log).unwrap();
        assert!(text.contains("accused"), "{text}");

        // Nothing stored: validation failed before storage was touched.
        assert!(!config.db_path.exists());
    }

    #[tokio::test]
    async fn unsupported_file_left_in_place() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        fs::write(config.drop_dir.join("notes.txt"), "hello").unwrap();

        let results = scan_cycle(&config).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].1, FileOutcome::Skipped));
        assert_eq!(dir_entries(&config.drop_dir).len(), 1);
        assert!(dir_entries(&config.processed_dir).is_empty());
        assert!(dir_entries(&config.failed_dir).is_empty());
    }

    #[tokio::test]
    async fn mixed_cycle_routes_each_file_terminally() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);
        fs::write(config.drop_dir.join("good.csv"), VALID_CSV).unwrap();
        fs::write(config.drop_dir.join("bad.csv"), "date\n2025-01-01\n").unwrap();
        fs::write(config.drop_dir.join("ignore.txt"), "x").unwrap();

        let results = scan_cycle(&config).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(dir_entries(&config.drop_dir).len(), 1);
        assert_eq!(dir_entries(&config.processed_dir).len(), 1);
        assert_eq!(dir_entries(&config.failed_dir).len(), 2);

        let db = CaseDb::open_existing(&config.db_path).await.unwrap();
        assert_eq!(db.case_count().await.unwrap(), 2);
        db.close().await;
    }
}
