//! The change selector: which events affect table state.
//!
//! A replace event counts only when it targets the whole table (the
//! `"0"` sentinel) and actually carries at least one non-empty table;
//! every modify event counts. Order is always preserved from the
//! parsed sequence.

use dendro_core::event::{Event, EventKind, WHOLE_TABLE_TARGET};
use dendro_core::EventId;

use crate::block::decode_replace_payload;

/// Whether this event changes table state when replayed.
pub fn is_table_event(event: &Event) -> bool {
    match &event.kind {
        EventKind::Replace { content } => {
            event.target() == Some(WHOLE_TABLE_TARGET) && !decode_replace_payload(content).is_empty()
        }
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// The ordered subsequence of table-affecting events with `id ≤ cutoff`.
///
/// An empty result is legal here; the reconstructor treats it as a
/// fatal precondition violation.
pub fn table_events(events: &[Event], cutoff: EventId) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| e.id <= cutoff && is_table_event(e))
        .collect()
}

/// Ids of every table-affecting event, unbounded — the cutoffs the CLI
/// replays in "all" mode.
pub fn table_event_ids(events: &[Event]) -> Vec<EventId> {
    events
        .iter()
        .filter(|e| is_table_event(e))
        .map(|e| e.id)
        .collect()
}
