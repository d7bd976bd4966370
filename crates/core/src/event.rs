//! The event capability.

use std::fmt;
use tracesim_types::{EventKind, SimTime};

/// Handle for an event inserted into the multiplexer's dynamic queue.
///
/// Returned by `add_new_event` and used to cancel the event before it is
/// delivered. Ids are unique within one multiplexer and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub(crate) u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event#{}", self.0)
    }
}

/// A follow-on action requested by an event's `process` effect.
///
/// Processing never calls back into the scheduler; instead it returns
/// effects, which the scheduler applies to the multiplexer after the
/// `process` call returns. This keeps the run loop non-reentrant.
pub enum Effect {
    /// Insert a new event into the multiplexer's dynamic queue.
    Schedule(Box<dyn Event>),
    /// Cancel a previously scheduled, not-yet-delivered dynamic event.
    Cancel(EventId),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Schedule(event) => f
                .debug_tuple("Schedule")
                .field(&event.kind())
                .field(&event.scheduled_time())
                .finish(),
            Effect::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
        }
    }
}

/// A unit of simulated work.
///
/// An event carries a scheduled time fixed at construction, a kind tag used
/// for accounting, and a side-effecting `process` action. The scheduler
/// guarantees `process` is invoked at most once per event; the processed
/// marker exists for introspection and tests, not re-entrancy control.
pub trait Event {
    /// The simulated instant at which this event fires. Immutable for the
    /// event's lifetime.
    fn scheduled_time(&self) -> SimTime;

    /// The kind tag used as the scheduler's accounting key.
    fn kind(&self) -> EventKind;

    /// Perform the event's effect, returning follow-on effects to apply.
    fn process(&mut self) -> Vec<Effect>;

    /// Mark the event as delivered.
    fn set_processed(&mut self);

    /// Whether the event has been delivered.
    fn is_processed(&self) -> bool;
}
