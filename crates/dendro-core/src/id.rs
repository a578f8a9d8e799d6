//! Strongly-typed identifiers for events, periods, and table rows.

use std::fmt;

/// Identifies one event block in the log.
///
/// Event ids appear as the first column of every line of a block and
/// are monotonically non-decreasing across the log. An id is assigned
/// once, when the block's first line is seen, and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A logical round of the experiment.
///
/// The wire value (the `m_period` field) is 0-based; human-facing
/// output shows [`display_value`](Period::display_value), which is the
/// wire value plus one. `Display` renders the wire value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period(pub u32);

impl Period {
    /// The 1-based value used in reports and in the `Period` table column.
    pub fn display_value(self) -> u32 {
        self.0 + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Period {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// The row-addressing key used by sparse modify events.
///
/// Internally rows are keyed by this value directly; display output
/// shows [`display_value`](RecordNr::display_value). Conversion from
/// wire numbers depends on [`RecordBase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordNr(pub i64);

impl RecordNr {
    /// The 1-based value shown in reports (internal key plus one).
    pub fn display_value(self) -> i64 {
        self.0 + 1
    }
}

impl fmt::Display for RecordNr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordNr {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Numbering base of record numbers on the wire.
///
/// Captured logs number rows from zero, but the protocol does not
/// document this, so the base is configuration rather than a constant.
/// Under [`Zero`](RecordBase::Zero) wire values are used directly as
/// internal keys; under [`One`](RecordBase::One) they are shifted down
/// by one on ingest so that display values match the wire again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordBase {
    /// Wire record numbers start at 0 (default, matches captured logs).
    #[default]
    Zero,
    /// Wire record numbers start at 1.
    One,
}

impl RecordBase {
    /// Convert a raw wire record number to the internal row key.
    pub fn to_internal(self, wire: i64) -> RecordNr {
        match self {
            Self::Zero => RecordNr(wire),
            Self::One => RecordNr(wire - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_display_is_one_based() {
        assert_eq!(Period(0).display_value(), 1);
        assert_eq!(Period(7).display_value(), 8);
    }

    #[test]
    fn record_base_conversion() {
        assert_eq!(RecordBase::Zero.to_internal(3), RecordNr(3));
        assert_eq!(RecordBase::One.to_internal(3), RecordNr(2));
        // Display is one-based either way.
        assert_eq!(RecordBase::Zero.to_internal(3).display_value(), 4);
        assert_eq!(RecordBase::One.to_internal(3).display_value(), 3);
    }
}
