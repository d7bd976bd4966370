//! Event kind tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of event kinds known to the simulation.
///
/// Every event carries exactly one kind, fixed at construction. The
/// scheduler uses the kind as its accounting key, so the set doubles as the
/// schema of `events_count_by_kind()` snapshots.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A read from a file.
    Read,
    /// A write to a file.
    Write,
    /// Closing a file.
    Close,
    /// Unlinking (deleting) a file.
    Unlink,
}

impl EventKind {
    /// All kinds, in their canonical (ordering) sequence.
    pub const ALL: [EventKind; 4] = [
        EventKind::Read,
        EventKind::Write,
        EventKind::Close,
        EventKind::Unlink,
    ];

    /// Stable lowercase name, matching the trace operation token.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Read => "read",
            EventKind::Write => "write",
            EventKind::Close => "close",
            EventKind::Unlink => "unlink",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
