//! Filesystem trace parsing.
//!
//! Turns a pre-recorded text trace of filesystem calls into typed events
//! the scheduler can replay. One record per line:
//!
//! ```text
//! # operation  begin-elapsed      path     [length]
//! read         1500000-9999       /tmp/f   4096
//! write        1600000-120        /tmp/f   512
//! close        1700000-3          /tmp/f
//! unlink       1800000-15         /tmp/f
//! ```
//!
//! Blank lines and `#` comments are skipped, as are unrecognized operation
//! names. The timestamp token keeps only the microseconds before the first
//! `-`, converted to whole milliseconds. Malformed recognized records are
//! fatal at the offending line; traces are assumed pre-validated.
//!
//! The concrete side effects of each operation live behind the
//! [`TraceEventHandler`] seam, so the emulated domain model stays outside
//! this crate.

mod error;
mod event;
mod parser;

pub use error::TraceError;
pub use event::{SharedHandler, TraceEvent, TraceEventHandler, TraceOp};
pub use parser::TraceParser;
