//! Event capability and source multiplexing.
//!
//! This crate defines the contracts the scheduler consumes:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              EventSourceMultiplexer                  │
//! │                                                      │
//! │  sources: Vec<Box<dyn EventSource>>  (trace parsers, │
//! │           synthetic workloads, ...)                  │
//! │  dynamic: BTreeMap<(SimTime, seq), Box<dyn Event>>   │
//! │                                                      │
//! │  next_event() → globally earliest pending event      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Events are polymorphic over [`EventKind`]; their `process` effect returns
//! [`Effect`] values instead of calling back into the scheduler, so the run
//! loop stays single-threaded and non-reentrant.

mod event;
mod mux;
mod source;

pub use event::{Effect, Event, EventId};
pub use mux::{CancelPolicy, EventSourceMultiplexer};
pub use source::{EventSource, SourceError};
