//! Shared logging setup for Caseflow binaries.
//!
//! Every command logs to stderr. The scheduler additionally appends to a
//! plain text log file (`scheduler.log` next to the drop folder) so unattended
//! runs leave a durable record: one timestamp/level/message line per event.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str =
    "caseflow=info,caseflow_sentinel=info,caseflow_ingest=info,caseflow_db=info";

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initialize tracing with stderr output only.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(default_filter()),
        )
        .init();
    Ok(())
}

/// Initialize tracing with stderr output plus an append-only log file.
pub fn init_logging_with_file(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }
    }
    let file_writer = SharedAppendWriter::open(log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(default_filter()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(default_filter()),
        )
        .init();
    Ok(())
}

/// Append-only log file shared across tracing's writer instances.
#[derive(Clone)]
struct SharedAppendWriter {
    inner: Arc<Mutex<File>>,
}

impl SharedAppendWriter {
    fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }
}

struct SharedAppendWriterGuard {
    inner: Arc<Mutex<File>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedAppendWriter {
    type Writer = SharedAppendWriterGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedAppendWriterGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for SharedAppendWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn append_writer_appends_across_instances() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("scheduler.log");

        let writer = SharedAppendWriter::open(&path).unwrap();
        writer.make_writer().write_all(b"first\n").unwrap();
        writer.clone().make_writer().write_all(b"second\n").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
