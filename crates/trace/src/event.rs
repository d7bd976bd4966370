//! Typed filesystem trace events.

use std::cell::RefCell;
use std::rc::Rc;
use tracesim_core::{Effect, Event};
use tracesim_types::{EventKind, SimTime};

/// Receiver of trace event effects.
///
/// Stands in for the emulated filesystem/client model, which is outside
/// this crate. The parser shares one handler across every event it
/// produces.
pub trait TraceEventHandler {
    /// A read of `length` bytes from `path`.
    fn on_read(&mut self, path: &str, length: u64);
    /// A write of `length` bytes to `path`.
    fn on_write(&mut self, path: &str, length: u64);
    /// Closing `path`.
    fn on_close(&mut self, path: &str);
    /// Unlinking `path`.
    fn on_unlink(&mut self, path: &str);
}

/// Handler shared between the parser and the events it produces.
pub type SharedHandler = Rc<RefCell<dyn TraceEventHandler>>;

/// The operation a trace record describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceOp {
    /// `read begin-elapsed path length`
    Read {
        /// File path read from.
        path: String,
        /// Bytes read.
        length: u64,
    },
    /// `write begin-elapsed path length`
    Write {
        /// File path written to.
        path: String,
        /// Bytes written.
        length: u64,
    },
    /// `close begin-elapsed path`
    Close {
        /// File path closed.
        path: String,
    },
    /// `unlink begin-elapsed path`
    Unlink {
        /// File path unlinked.
        path: String,
    },
}

impl TraceOp {
    /// The kind tag for this operation.
    pub fn kind(&self) -> EventKind {
        match self {
            TraceOp::Read { .. } => EventKind::Read,
            TraceOp::Write { .. } => EventKind::Write,
            TraceOp::Close { .. } => EventKind::Close,
            TraceOp::Unlink { .. } => EventKind::Unlink,
        }
    }

    /// The path this operation touches.
    pub fn path(&self) -> &str {
        match self {
            TraceOp::Read { path, .. }
            | TraceOp::Write { path, .. }
            | TraceOp::Close { path }
            | TraceOp::Unlink { path } => path,
        }
    }
}

/// A parsed trace record, ready for scheduling.
pub struct TraceEvent {
    time: SimTime,
    op: TraceOp,
    handler: SharedHandler,
    processed: bool,
}

impl TraceEvent {
    /// Create an event firing `op` at `time` against `handler`.
    pub fn new(time: SimTime, op: TraceOp, handler: SharedHandler) -> Self {
        Self {
            time,
            op,
            handler,
            processed: false,
        }
    }

    /// The operation this event performs.
    pub fn op(&self) -> &TraceOp {
        &self.op
    }
}

impl Event for TraceEvent {
    fn scheduled_time(&self) -> SimTime {
        self.time
    }

    fn kind(&self) -> EventKind {
        self.op.kind()
    }

    fn process(&mut self) -> Vec<Effect> {
        let mut handler = self.handler.borrow_mut();
        match &self.op {
            TraceOp::Read { path, length } => handler.on_read(path, *length),
            TraceOp::Write { path, length } => handler.on_write(path, *length),
            TraceOp::Close { path } => handler.on_close(path),
            TraceOp::Unlink { path } => handler.on_unlink(path),
        }
        Vec::new()
    }

    fn set_processed(&mut self) {
        self.processed = true;
    }

    fn is_processed(&self) -> bool {
        self.processed
    }
}
