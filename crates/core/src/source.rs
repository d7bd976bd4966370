//! The ordered event producer contract.

use crate::Event;
use thiserror::Error;

/// Errors produced while reading events from a source.
///
/// Sources read pre-validated inputs, so every failure is fatal to the run;
/// there is no retry path.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the underlying input failed.
    #[error("I/O error reading event source: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be turned into an event.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// A lazy, finite, non-restartable producer of time-ordered events.
///
/// # Contract
///
/// - Successive calls yield events with non-decreasing scheduled times.
/// - `Ok(None)` marks end-of-stream; once returned, every later call must
///   also return `Ok(None)`.
/// - Errors are fatal and surface at the offending record, not earlier.
pub trait EventSource {
    /// Pull the next event, or `None` once the source is exhausted.
    fn next_event(&mut self) -> Result<Option<Box<dyn Event>>, SourceError>;
}
