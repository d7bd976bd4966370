//! Run results.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracesim_types::{EventKind, SimTime};

/// The outcome of one replay run.
#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    /// Processed events per kind.
    pub events_by_kind: BTreeMap<EventKind, u64>,
    /// Total processed events.
    pub events_total: u64,
    /// The simulated clock when the run finished.
    pub final_clock: SimTime,
    /// Ordering violations tolerated under the keep-going policy.
    pub ordering_violations: u64,
    /// Bytes read by processed read events.
    pub bytes_read: u64,
    /// Bytes written by processed write events.
    pub bytes_written: u64,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "replay finished at {}", self.final_clock)?;
        writeln!(f, "  events processed: {}", self.events_total)?;
        for (kind, count) in &self.events_by_kind {
            writeln!(f, "    {kind}: {count}")?;
        }
        writeln!(f, "  bytes read:    {}", self.bytes_read)?;
        writeln!(f, "  bytes written: {}", self.bytes_written)?;
        if self.ordering_violations > 0 {
            writeln!(f, "  ordering violations dropped: {}", self.ordering_violations)?;
        }
        Ok(())
    }
}
