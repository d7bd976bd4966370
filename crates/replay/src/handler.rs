//! Byte-accounting trace event handler.

use tracesim_trace::TraceEventHandler;
use tracing::debug;

/// A [`TraceEventHandler`] that tallies transferred bytes.
///
/// The replay runner installs one per run and folds its totals into the
/// final report. It performs no filesystem modeling; richer domain models
/// plug in by providing their own handler.
#[derive(Debug, Default)]
pub struct StatsHandler {
    bytes_read: u64,
    bytes_written: u64,
}

impl StatsHandler {
    /// Create a zeroed handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Total bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

impl TraceEventHandler for StatsHandler {
    fn on_read(&mut self, path: &str, length: u64) {
        self.bytes_read += length;
        debug!(path, length, "read");
    }

    fn on_write(&mut self, path: &str, length: u64) {
        self.bytes_written += length;
        debug!(path, length, "write");
    }

    fn on_close(&mut self, path: &str) {
        debug!(path, "close");
    }

    fn on_unlink(&mut self, path: &str) {
        debug!(path, "unlink");
    }
}
