//! Error types for parsing and reconstruction.
//!
//! The log is produced mechanically by the experiment server, so any
//! structural violation means the file is corrupt or the format has
//! drifted: parse errors abort the whole run, reconstruction errors
//! abort only the offending cutoff request. Every message names the
//! offending event id where one exists, so a bad capture can be
//! located in the source file.

use std::error::Error;
use std::fmt;

use crate::id::EventId;

/// Errors raised while folding raw log lines into events.
///
/// Any of these invalidates the whole event sequence; there is no
/// partial recovery beyond the connection-notice fallback, which is
/// handled inside the parser and never surfaces here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A continuation-shaped line arrived before any event block opened.
    ContinuationBeforeEvent {
        /// 1-based line number in the input.
        line: usize,
    },
    /// The first column of a block line is not a non-negative integer.
    BadEventId {
        /// 1-based line number in the input.
        line: usize,
        /// The offending first-column text.
        text: String,
    },
    /// A modify content line arrived before any `m_recordNrs` keyword
    /// opened a payload buffer.
    ContentBeforeRecordNrs {
        /// The event the line belongs to.
        event: EventId,
    },
    /// An `m_recordNrs` value is not an integer.
    BadRecordNr {
        /// The event the line belongs to.
        event: EventId,
        /// The offending token.
        text: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContinuationBeforeEvent { line } => {
                write!(f, "line {line}: continuation before any event block")
            }
            Self::BadEventId { line, text } => {
                write!(f, "line {line}: unparseable event id {text:?}")
            }
            Self::ContentBeforeRecordNrs { event } => {
                write!(f, "event {event}: content line before m_recordNrs")
            }
            Self::BadRecordNr { event, text } => {
                write!(f, "event {event}: unparseable record number {text:?}")
            }
        }
    }
}

impl Error for ParseError {}

/// Errors raised while replaying selected events into period states.
///
/// Fatal for the requested cutoff only; other cutoffs against the same
/// parsed event sequence are unaffected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconstructError {
    /// No table-affecting event exists at or before the cutoff, so
    /// there is no period to anchor reconstruction.
    EmptySelection {
        /// The requested cutoff.
        cutoff: EventId,
    },
    /// A selected event has a missing or non-numeric `m_period` field.
    BadPeriod {
        /// The offending event.
        event: EventId,
    },
    /// A selected event's period is lower than the current period; the
    /// log is assumed period-ordered within the selection.
    PeriodRegression {
        /// The offending event.
        event: EventId,
        /// The event's period (wire value).
        found: u32,
        /// The period the replay had reached.
        current: u32,
    },
    /// A modify event declares more affected tables than it carries
    /// payload buffers.
    TableCountMismatch {
        /// The offending event.
        event: EventId,
        /// The `m_recordNrs` counter value.
        declared: usize,
        /// Payload buffers actually present.
        buffers: usize,
    },
    /// A modify event names a table with no matching record-number
    /// list, and the table is not the session table.
    MissingRecordNrs {
        /// The offending event.
        event: EventId,
        /// The table name from `m_DB`.
        table: String,
    },
    /// A session-table modify has a missing or non-numeric `target`.
    BadTarget {
        /// The offending event.
        event: EventId,
    },
    /// A modify payload carries fewer data rows than target records.
    ShortModifyPayload {
        /// The offending event.
        event: EventId,
        /// The table name from `m_DB`.
        table: String,
        /// Target records addressed.
        expected: usize,
        /// Data rows present in the payload.
        actual: usize,
    },
}

impl fmt::Display for ReconstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelection { cutoff } => {
                write!(f, "no table-affecting events at or before cutoff {cutoff}")
            }
            Self::BadPeriod { event } => {
                write!(f, "event {event}: missing or non-numeric m_period")
            }
            Self::PeriodRegression {
                event,
                found,
                current,
            } => {
                write!(
                    f,
                    "event {event}: period {found} below current period {current}"
                )
            }
            Self::TableCountMismatch {
                event,
                declared,
                buffers,
            } => {
                write!(
                    f,
                    "event {event}: {declared} affected tables but {buffers} payload buffers"
                )
            }
            Self::MissingRecordNrs { event, table } => {
                write!(f, "event {event}: table '{table}' has no m_recordNrs list")
            }
            Self::BadTarget { event } => {
                write!(f, "event {event}: missing or non-numeric target")
            }
            Self::ShortModifyPayload {
                event,
                table,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "event {event}: table '{table}' payload has {actual} rows \
                     for {expected} target records"
                )
            }
        }
    }
}

impl Error for ReconstructError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_event() {
        let e = ReconstructError::MissingRecordNrs {
            event: EventId(41),
            table: "contracts".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("41"));
        assert!(msg.contains("contracts"));
    }
}
