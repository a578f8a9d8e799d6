//! The period table reconstructor: replaying selected events into
//! per-period table states.
//!
//! One reconstruction run owns its chain of [`PeriodState`]s and never
//! mutates the shared event sequence, so multiple cutoff requests can
//! replay the same parsed log independently.

use dendro_core::event::{Event, EventKind, ModifyPayload, SESSION_TABLE};
use dendro_core::{
    Dataset, EventId, Period, PeriodState, ReconstructError, RecordBase, RecordNr, PERIOD_COLUMN,
};

use crate::block::{decode_replace_payload, decode_table};
use crate::merge::merge;
use crate::select::table_events;

/// Knobs for one reconstruction run.
#[derive(Clone, Debug, Default)]
pub struct ReconstructOptions {
    /// Numbering base of wire record numbers. Default: zero-based,
    /// matching captured logs.
    pub record_base: RecordBase,
}

/// Reconstruct all table state at `cutoff` (inclusive) and merge it
/// into one dataset per table name.
///
/// # Errors
///
/// [`ReconstructError::EmptySelection`] when no table-affecting event
/// exists at or before the cutoff; the other variants when a selected
/// event is structurally inconsistent (see [`ReconstructError`]).
pub fn reconstruct(
    events: &[Event],
    cutoff: EventId,
    options: &ReconstructOptions,
) -> Result<Dataset, ReconstructError> {
    let states = replay_periods(events, cutoff, options)?;
    Ok(merge(&states))
}

/// Replay the selection at `cutoff` into one [`PeriodState`] per
/// distinct period, in period order.
pub fn replay_periods(
    events: &[Event],
    cutoff: EventId,
    options: &ReconstructOptions,
) -> Result<Vec<PeriodState>, ReconstructError> {
    let selected = table_events(events, cutoff);
    if selected.is_empty() {
        return Err(ReconstructError::EmptySelection { cutoff });
    }

    let mut states: Vec<PeriodState> = Vec::new();
    for event in selected {
        let period = event
            .period()
            .ok_or(ReconstructError::BadPeriod { event: event.id })?;
        let state = open_state(&mut states, period, event.id)?;
        match &event.kind {
            EventKind::Replace { content } => apply_replace(state, content, period),
            EventKind::Modify(payload) => {
                apply_modify(state, event, payload, period, options.record_base)?
            }
            _ => {}
        }
    }
    Ok(states)
}

/// Advance to `period`, opening a new state when it exceeds the
/// current one. Periods are visited monotonically within the
/// selection; a regression means the log is inconsistent.
fn open_state(
    states: &mut Vec<PeriodState>,
    period: Period,
    event: EventId,
) -> Result<&mut PeriodState, ReconstructError> {
    match states.last().map(|s| s.period) {
        Some(current) if period < current => {
            return Err(ReconstructError::PeriodRegression {
                event,
                found: period.0,
                current: current.0,
            });
        }
        Some(current) if period == current => {}
        _ => states.push(PeriodState::new(period)),
    }
    // A state was pushed above whenever the list was empty.
    states
        .last_mut()
        .ok_or(ReconstructError::EmptySelection { cutoff: event })
}

/// Full replace: insert new tables wholesale; overwrite existing ones
/// column by column (each payload column fully replaces its
/// counterpart, so a whole-table payload fully replaces the table,
/// while a column subset leaves the other columns' rows intact).
fn apply_replace(state: &mut PeriodState, content: &str, period: Period) {
    for (name, table) in decode_replace_payload(content) {
        if state.tables.contains_key(&name) {
            let existing = state.table_mut(&name);
            for (column, cells) in table.columns() {
                existing.replace_column(column, cells.clone());
            }
        } else {
            state.tables.insert(name.clone(), table);
        }
        let merged = state.table_mut(&name);
        drop_orphan_period_tags(merged);
        if !merged.has_column(PERIOD_COLUMN) {
            merged.stamp_period(period);
        }
    }
}

/// A row replaced away must not survive through its synthetic `Period`
/// tag alone: drop the tag wherever no other column holds a cell.
fn drop_orphan_period_tags(table: &mut dendro_core::Table) {
    let Some(tagged) = table.column(PERIOD_COLUMN) else {
        return;
    };
    let orphans: Vec<RecordNr> = tagged
        .keys()
        .copied()
        .filter(|&record| {
            !table
                .columns()
                .any(|(name, cells)| name != PERIOD_COLUMN && cells.contains_key(&record))
        })
        .collect();
    for record in orphans {
        table.remove(record, PERIOD_COLUMN);
    }
}

/// Sparse modify: upsert the decoded payload rows into their target
/// records, touching only the named columns plus `Period`.
fn apply_modify(
    state: &mut PeriodState,
    event: &Event,
    payload: &ModifyPayload,
    period: Period,
    base: RecordBase,
) -> Result<(), ReconstructError> {
    if payload.table_count > payload.content.len() {
        return Err(ReconstructError::TableCountMismatch {
            event: event.id,
            declared: payload.table_count,
            buffers: payload.content.len(),
        });
    }
    if payload.table_count > payload.table_names.len() {
        return Err(ReconstructError::TableCountMismatch {
            event: event.id,
            declared: payload.table_count,
            buffers: payload.table_names.len(),
        });
    }

    for index in 0..payload.table_count {
        let name = &payload.table_names[index];
        let records: Vec<RecordNr> = if name == SESSION_TABLE {
            let target: i64 = event
                .target()
                .and_then(|t| t.parse().ok())
                .ok_or(ReconstructError::BadTarget { event: event.id })?;
            vec![base.to_internal(target)]
        } else {
            payload
                .record_nrs
                .get(index)
                .ok_or_else(|| ReconstructError::MissingRecordNrs {
                    event: event.id,
                    table: name.clone(),
                })?
                .iter()
                .map(|&wire| base.to_internal(wire))
                .collect()
        };

        let decoded = decode_table(&payload.content[index]);
        if decoded.row_count() < records.len() {
            return Err(ReconstructError::ShortModifyPayload {
                event: event.id,
                table: name.clone(),
                expected: records.len(),
                actual: decoded.row_count(),
            });
        }

        let table = state.table_mut(name);
        let period_value = period.display_value().to_string();
        for (row, &record) in records.iter().enumerate() {
            for column in decoded.column_names() {
                if let Some(value) = decoded.get(RecordNr(row as i64), column) {
                    table.set(record, column, value.to_string());
                }
            }
            table.set(record, PERIOD_COLUMN, period_value.clone());
        }
    }
    Ok(())
}
