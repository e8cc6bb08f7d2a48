//! Drop-folder scheduler for Caseflow.
//!
//! Polls an inbox directory for dropped `.csv`/`.xlsx` template files, runs
//! each one through the import pipeline, and routes it to a terminal location:
//! processed on success, failed (plus an error log) otherwise. Single-threaded
//! and synchronous within a scan; the only suspension point is the deliberate
//! sleep between polls.

mod config;
mod sentinel;

pub use config::SentinelConfig;
pub use sentinel::{
    attempt_import, route_file, run, scan_cycle, supported_extension, timestamped_name,
    FileOutcome, ImportOutcome,
};
