//! Test helpers for tracesim.
//!
//! Scripted events and sources used by scheduler and replay tests. The
//! [`ProcessLog`] records every processed event so tests can assert on the
//! exact delivery order.

use std::cell::RefCell;
use std::rc::Rc;
use tracesim_core::{Effect, Event, EventSource, SourceError};
use tracesim_types::{EventKind, SimTime};

/// Shared record of processed events, in delivery order.
#[derive(Clone, Default)]
pub struct ProcessLog {
    entries: Rc<RefCell<Vec<(EventKind, SimTime)>>>,
}

impl ProcessLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all `(kind, time)` entries recorded so far.
    pub fn entries(&self) -> Vec<(EventKind, SimTime)> {
        self.entries.borrow().clone()
    }

    /// Delivery times only, in order.
    pub fn times(&self) -> Vec<SimTime> {
        self.entries.borrow().iter().map(|(_, time)| *time).collect()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn record(&self, kind: EventKind, time: SimTime) {
        self.entries.borrow_mut().push((kind, time));
    }
}

/// A scripted event that records itself into a [`ProcessLog`] when
/// processed, optionally emitting canned follow-on effects.
pub struct ProbeEvent {
    time: SimTime,
    kind: EventKind,
    log: ProcessLog,
    effects: Vec<Effect>,
    processed: bool,
}

impl ProbeEvent {
    /// Create a probe at the given time, recording into `log`.
    pub fn new(time: SimTime, kind: EventKind, log: ProcessLog) -> Self {
        Self {
            time,
            kind,
            log,
            effects: Vec::new(),
            processed: false,
        }
    }

    /// Boxed convenience constructor with a millisecond timestamp.
    pub fn boxed(millis: u64, kind: EventKind, log: &ProcessLog) -> Box<dyn Event> {
        Box::new(Self::new(SimTime::from_millis(millis), kind, log.clone()))
    }

    /// Attach effects to emit when processed.
    pub fn with_effects(mut self, effects: Vec<Effect>) -> Self {
        self.effects = effects;
        self
    }
}

impl Event for ProbeEvent {
    fn scheduled_time(&self) -> SimTime {
        self.time
    }

    fn kind(&self) -> EventKind {
        self.kind
    }

    fn process(&mut self) -> Vec<Effect> {
        self.log.record(self.kind, self.time);
        std::mem::take(&mut self.effects)
    }

    fn set_processed(&mut self) {
        self.processed = true;
    }

    fn is_processed(&self) -> bool {
        self.processed
    }
}

/// An [`EventSource`] yielding a pre-sorted script of events.
pub struct ScriptedSource {
    events: std::vec::IntoIter<Box<dyn Event>>,
}

impl ScriptedSource {
    /// Build from events already sorted by scheduled time. The source does
    /// not re-sort; out-of-order scripts are how ordering-violation tests
    /// provoke the scheduler.
    pub fn new(events: Vec<Box<dyn Event>>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }

    /// Boxed convenience constructor.
    pub fn boxed(events: Vec<Box<dyn Event>>) -> Box<dyn EventSource> {
        Box::new(Self::new(events))
    }
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self) -> Result<Option<Box<dyn Event>>, SourceError> {
        Ok(self.events.next())
    }
}

/// A source that yields a fixed number of events and then fails, for
/// exercising the fatal malformed-input path.
pub struct FailingSource {
    inner: ScriptedSource,
    failing_line: usize,
}

impl FailingSource {
    /// Yield `events`, then fail claiming a malformed record at `line`.
    pub fn new(events: Vec<Box<dyn Event>>, line: usize) -> Self {
        Self {
            inner: ScriptedSource::new(events),
            failing_line: line,
        }
    }
}

impl EventSource for FailingSource {
    fn next_event(&mut self) -> Result<Option<Box<dyn Event>>, SourceError> {
        match self.inner.next_event()? {
            Some(event) => Ok(Some(event)),
            None => Err(SourceError::MalformedRecord {
                line: self.failing_line,
                reason: "scripted failure".to_string(),
            }),
        }
    }
}
