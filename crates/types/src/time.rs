//! Simulated timestamps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Units accepted when constructing a [`SimTime`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    /// Microseconds.
    Micros,
    /// Milliseconds.
    Millis,
    /// Seconds.
    Seconds,
}

/// An immutable simulated timestamp.
///
/// Internally normalized to microseconds, so timestamps constructed with
/// different units compare correctly. The magnitude is a `u64`, which makes
/// negative times unrepresentable by construction. Simulated time has no
/// relation to wall-clock time; a run starts at [`SimTime::ZERO`] and only
/// moves forward.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SimTime {
    micros: u64,
}

impl SimTime {
    /// Time zero, the clock value of a freshly reset scheduler.
    pub const ZERO: Self = Self { micros: 0 };

    /// Create a timestamp from a magnitude in the given unit.
    pub fn new(magnitude: u64, unit: TimeUnit) -> Self {
        let micros = match unit {
            TimeUnit::Micros => magnitude,
            TimeUnit::Millis => magnitude * 1_000,
            TimeUnit::Seconds => magnitude * 1_000_000,
        };
        Self { micros }
    }

    /// Create a timestamp from microseconds.
    pub const fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    /// Create a timestamp from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            micros: millis * 1_000,
        }
    }

    /// Create a timestamp from seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            micros: secs * 1_000_000,
        }
    }

    /// Magnitude in microseconds.
    pub const fn as_micros(&self) -> u64 {
        self.micros
    }

    /// Magnitude in whole milliseconds (truncating).
    pub const fn as_millis(&self) -> u64 {
        self.micros / 1_000
    }

    /// Whether this timestamp is strictly earlier than `other`.
    pub fn is_earlier_than(&self, other: SimTime) -> bool {
        self.micros < other.micros
    }

    /// Saturating addition of a microsecond delta.
    pub const fn saturating_add_micros(&self, delta: u64) -> Self {
        Self {
            micros: self.micros.saturating_add(delta),
        }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.micros % 1_000 == 0 {
            write!(f, "{}ms", self.micros / 1_000)
        } else {
            write!(f, "{}us", self.micros)
        }
    }
}

impl fmt::Debug for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimTime({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_normalization() {
        assert_eq!(SimTime::new(1, TimeUnit::Seconds), SimTime::from_millis(1_000));
        assert_eq!(SimTime::new(1, TimeUnit::Millis), SimTime::from_micros(1_000));
        assert_eq!(SimTime::new(42, TimeUnit::Micros), SimTime::from_micros(42));
    }

    #[test]
    fn test_total_order() {
        let early = SimTime::from_millis(500);
        let late = SimTime::from_millis(1_500);
        assert!(early.is_earlier_than(late));
        assert!(!late.is_earlier_than(early));
        assert!(!early.is_earlier_than(early));
        assert!(early < late);
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(SimTime::default(), SimTime::ZERO);
        assert_eq!(SimTime::ZERO.as_micros(), 0);
    }

    #[test]
    fn test_display_picks_unit() {
        assert_eq!(SimTime::from_millis(1_500).to_string(), "1500ms");
        assert_eq!(SimTime::from_micros(1_500).to_string(), "1500us");
        assert_eq!(SimTime::ZERO.to_string(), "0ms");
    }
}
