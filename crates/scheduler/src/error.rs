//! Scheduler error types.

use thiserror::Error;
use tracesim_core::SourceError;
use tracesim_types::{EventKind, SimTime};

/// Fatal scheduler failures.
///
/// Advisory anomalies (ordering violations under the keep-going policy,
/// unknown cancellations) are logged instead; everything here aborts the
/// run.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `start` was invoked without a prior successful `setup`.
    #[error("scheduler is not configured; call setup() before start()")]
    NotConfigured,

    /// An event's scheduled time precedes the current clock and the
    /// stop-on-error policy is enabled.
    #[error(
        "emulation clock ({now}) already ahead of {kind} event time ({event_time}); \
         event is outdated and will not be processed"
    )]
    OrderingViolation {
        /// Kind of the offending event.
        kind: EventKind,
        /// The offending event's scheduled time.
        event_time: SimTime,
        /// The clock value at the time of the violation.
        now: SimTime,
    },

    /// An event source failed while producing the next event.
    #[error(transparent)]
    Source(#[from] SourceError),
}
