//! Trace parsing errors.

use thiserror::Error;
use tracesim_core::SourceError;

/// Errors while reading a trace.
///
/// All of these are fatal to the run; there is no recovery path for a bad
/// trace record.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Reading the underlying stream failed.
    #[error("I/O error reading trace: {0}")]
    Io(#[from] std::io::Error),

    /// A recognized operation had missing or unparsable fields.
    #[error("malformed trace record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number of the offending record.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

impl From<TraceError> for SourceError {
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::Io(io) => SourceError::Io(io),
            TraceError::MalformedRecord { line, reason } => {
                SourceError::MalformedRecord { line, reason }
            }
        }
    }
}
