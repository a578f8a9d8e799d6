//! The parsed event model.
//!
//! A GameSafe log is a sequence of event blocks. Every block shares an
//! id (first column) and an event name (second column); subsequent
//! lines of the block add keyword/value fields or embedded payload
//! text. [`Event`] carries the generic field bag shared by all kinds
//! plus an [`EventKind`] payload holding only what that kind can
//! legitimately contain.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::id::{EventId, Period};

/// Wire name of a client connection notice.
pub const EVENT_CLIENT_INFO: &str = "CGESMClientInfo";
/// Wire name of the experiment parameter declaration.
pub const EVENT_PARAMETERS: &str = "CGEMSParameters";
/// Wire name of a full table replace.
pub const EVENT_DB_REPLACE: &str = "CGEMS_PGX_DBReplace";
/// Wire name of a sparse table modify.
pub const EVENT_DB_MODIFY: &str = "CGEMS_PGX_DBModify";
/// Wire name of a questionnaire completion.
pub const EVENT_QUESTER_DONE: &str = "CGESMQuesterDone";

/// `target` value marking a replace event that redefines whole tables
/// rather than a view or a single client's copy.
pub const WHOLE_TABLE_TARGET: &str = "0";

/// Name of the distinguished single-row session table. Modify events
/// address its only row through their `target` field instead of
/// `m_recordNrs`.
pub const SESSION_TABLE: &str = "session";

/// Kind-specific payload of an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A client terminal connected. Name and address arrive on short
    /// continuation lines and are recognized by textual prefix.
    ClientInfo {
        /// Client name, e.g. the terminal's hostname.
        name: Option<String>,
        /// Client IP address.
        ip_address: Option<String>,
    },
    /// Experiment parameter declaration with an embedded name/value
    /// payload block.
    Parameters {
        /// Raw embedded payload text (tab-separated name/value lines).
        content: String,
        /// Subject count, delivered on an out-of-shape line.
        num_subjects: Option<String>,
    },
    /// Full table replace. The payload is the raw `TABLE`-segmented
    /// block text, decoded lazily by the replay engine.
    Replace {
        /// Raw embedded payload text.
        content: String,
    },
    /// Sparse record-level modify of one or more tables.
    Modify(ModifyPayload),
    /// Questionnaire completion carrying question and answer lists.
    QuesterDone {
        /// Question texts, in presentation order.
        questions: Vec<String>,
        /// Answer texts, parallel to `questions`.
        answers: Vec<String>,
    },
    /// Any other event name. Generic fields only.
    Other,
}

/// Payload of a sparse modify event.
///
/// One event may touch several tables at once. Each `m_recordNrs`
/// keyword opens a new slot: it advances the table counter, appends a
/// record-number list, and opens a fresh payload buffer that
/// subsequent content lines append into. `m_operation` and `m_DB`
/// values accumulate in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifyPayload {
    /// `m_operation` values, one per affected table.
    pub operations: Vec<String>,
    /// `m_DB` values: the affected table names, in order.
    pub table_names: Vec<String>,
    /// Raw wire record numbers per affected table, in `m_recordNrs`
    /// order. Conversion to internal [`RecordNr`](crate::id::RecordNr)
    /// keys happens at reconstruction time, governed by
    /// [`RecordBase`](crate::id::RecordBase).
    pub record_nrs: Vec<SmallVec<[i64; 8]>>,
    /// Raw header+rows payload text per affected table.
    pub content: Vec<String>,
    /// Number of `m_recordNrs` keywords seen (payload slots opened).
    pub table_count: usize,
}

/// One parsed event block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// The block's unique id.
    pub id: EventId,
    /// The wire event name (second column of the opening line).
    pub name: String,
    /// Generic keyword/value fields set by the shared 3rd/4th-column rule.
    pub fields: IndexMap<String, String>,
    /// Kind-specific payload.
    pub kind: EventKind,
}

impl Event {
    /// Create an empty event of the kind implied by `name`.
    pub fn new(id: EventId, name: &str) -> Self {
        let kind = match name {
            EVENT_CLIENT_INFO => EventKind::ClientInfo {
                name: None,
                ip_address: None,
            },
            EVENT_PARAMETERS => EventKind::Parameters {
                content: String::new(),
                num_subjects: None,
            },
            EVENT_DB_REPLACE => EventKind::Replace {
                content: String::new(),
            },
            EVENT_DB_MODIFY => EventKind::Modify(ModifyPayload::default()),
            EVENT_QUESTER_DONE => EventKind::QuesterDone {
                questions: Vec::new(),
                answers: Vec::new(),
            },
            _ => EventKind::Other,
        };
        Self {
            id,
            name: name.to_string(),
            fields: IndexMap::new(),
            kind,
        }
    }

    /// Look up a generic field by keyword.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// The event's logical period (`m_period` field), if present and numeric.
    pub fn period(&self) -> Option<Period> {
        self.field("m_period")?.parse::<u32>().ok().map(Period)
    }

    /// The event's `time` field.
    pub fn time(&self) -> Option<&str> {
        self.field("time")
    }

    /// The event's `target` field.
    pub fn target(&self) -> Option<&str> {
        self.field("target")
    }

    /// The event's `source` field (the originating client number).
    pub fn source(&self) -> Option<&str> {
        self.field("source")
    }

    /// Whether this is a full table replace.
    pub fn is_replace(&self) -> bool {
        matches!(self.kind, EventKind::Replace { .. })
    }

    /// Whether this is a sparse modify.
    pub fn is_modify(&self) -> bool {
        matches!(self.kind, EventKind::Modify(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_name() {
        assert!(Event::new(EventId(0), EVENT_DB_REPLACE).is_replace());
        assert!(Event::new(EventId(0), EVENT_DB_MODIFY).is_modify());
        assert_eq!(Event::new(EventId(0), "CGEMSTime").kind, EventKind::Other);
    }

    #[test]
    fn period_parses_wire_field() {
        let mut ev = Event::new(EventId(3), EVENT_DB_MODIFY);
        assert_eq!(ev.period(), None);
        ev.fields.insert("m_period".into(), "2".into());
        assert_eq!(ev.period(), Some(Period(2)));
        ev.fields.insert("m_period".into(), "two".into());
        assert_eq!(ev.period(), None);
    }
}
