//! Configuration for a replay run.

use tracesim_core::CancelPolicy;
use tracesim_types::SimTime;

/// Configuration for a replay run.
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Start of the emulation window. Events scheduled earlier are
    /// pre-history and silently dropped.
    pub window_start: SimTime,

    /// End of the emulation window (exclusive). Events at or past it are
    /// drained without effect.
    pub window_end: SimTime,

    /// Abort the run on an ordering violation (the default) instead of
    /// dropping the offending event.
    pub stop_on_error: bool,

    /// Policy for cancelling events the multiplexer does not hold.
    pub cancel_policy: CancelPolicy,
}

impl ReplayConfig {
    /// Create a configuration with an unbounded window and the default
    /// policies.
    pub fn new() -> Self {
        Self {
            window_start: SimTime::ZERO,
            window_end: SimTime::from_micros(u64::MAX),
            stop_on_error: true,
            cancel_policy: CancelPolicy::default(),
        }
    }

    /// Set the emulation window `[start, end)`.
    pub fn with_window(mut self, start: SimTime, end: SimTime) -> Self {
        self.window_start = start;
        self.window_end = end;
        self
    }

    /// Drop out-of-order events with a warning instead of aborting.
    pub fn keep_going(mut self) -> Self {
        self.stop_on_error = false;
        self
    }

    /// Set the unknown-cancellation policy.
    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self::new()
    }
}
