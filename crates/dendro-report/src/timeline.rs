//! The experiment timeline report.
//!
//! Projects the full parsed event sequence into a four-part
//! human-facing history: client connections, experiment parameters,
//! table-affecting events, and questionnaire responses. The core never
//! formats this; the projector reads only public accessors.

use std::path::Path;

use dendro_core::event::{Event, EventKind};
use dendro_core::{RecordBase, Table};
use dendro_replay::{decode_replace_payload, decode_table, is_table_event};

use crate::error::ReportError;
use crate::writer::write_rows;

/// Build the timeline rows. Row lengths vary by part, as in a
/// spreadsheet; parts are separated by one empty row. `base` governs
/// how wire record numbers are shown, consistent with reconstruction.
pub fn timeline_rows(events: &[Event], base: RecordBase) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    connection_part(events, &mut rows);
    rows.push(vec![String::new()]);
    parameter_part(events, &mut rows);
    rows.push(vec![String::new()]);
    change_part(events, base, &mut rows);
    rows.push(vec![String::new()]);
    questionnaire_part(events, &mut rows);
    rows
}

/// Write the timeline to a tab-delimited file at `path`.
pub fn write_timeline(
    events: &[Event],
    base: RecordBase,
    path: &Path,
) -> Result<(), ReportError> {
    write_rows(path, &timeline_rows(events, base))
}

fn connection_part(events: &[Event], rows: &mut Vec<Vec<String>>) {
    rows.push(strings(&["time", "client name", "ip address"]));
    for event in events {
        if let EventKind::ClientInfo { name, ip_address } = &event.kind {
            rows.push(vec![
                event.time().unwrap_or_default().to_string(),
                name.clone().unwrap_or_default(),
                ip_address.clone().unwrap_or_default(),
            ]);
        }
    }
}

fn parameter_part(events: &[Event], rows: &mut Vec<Vec<String>>) {
    rows.push(strings(&["parameter name", "value"]));
    let declaration = events.iter().find_map(|e| match &e.kind {
        EventKind::Parameters {
            content,
            num_subjects,
        } => Some((content, num_subjects)),
        _ => None,
    });
    let Some((content, num_subjects)) = declaration else {
        return;
    };
    for line in content.trim_end().lines() {
        let mut fields = line.split('\t');
        let name = fields.next().unwrap_or_default().to_string();
        let value = fields.next().unwrap_or_default().to_string();
        rows.push(vec![name, value]);
    }
    if let Some(count) = num_subjects {
        rows.push(vec!["numSubjects".to_string(), count.clone()]);
    }
}

/// `table.column` labels for the decoded tables of one event.
fn variable_names(tables: &[(String, Table)]) -> Vec<String> {
    tables
        .iter()
        .flat_map(|(name, table)| {
            table
                .column_names()
                .map(|column| format!("{name}.{column}"))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn change_part(events: &[Event], base: RecordBase, rows: &mut Vec<Vec<String>>) {
    rows.push(strings(&[
        "Period",
        "Event ID",
        "Time",
        "Event Type",
        "Subject",
        "Tables Affected",
        "Variables Changed",
    ]));
    for event in events.iter().filter(|e| is_table_event(e)) {
        let period = event
            .period()
            .map(|p| p.display_value().to_string())
            .unwrap_or_default();
        let time = event.time().unwrap_or_default().to_string();
        match &event.kind {
            EventKind::Replace { content } => {
                let tables = decode_replace_payload(content);
                let names: Vec<&str> = tables.iter().map(|(n, _)| n.as_str()).collect();
                let mut row = vec![
                    period,
                    event.id.to_string(),
                    time,
                    "Table replace".to_string(),
                    "All".to_string(),
                    names.join(" "),
                ];
                row.extend(variable_names(&tables));
                rows.push(row);
            }
            EventKind::Modify(payload) => {
                // Subjects are named only when the subjects table is
                // among the affected ones; tables like contracts do
                // not involve a specific subject.
                let subject = payload
                    .table_names
                    .iter()
                    .position(|n| n == "subjects")
                    .and_then(|idx| payload.record_nrs.get(idx))
                    .map(|nrs| {
                        nrs.iter()
                            .map(|&nr| base.to_internal(nr).display_value().to_string())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_else(|| "N/A".to_string());
                let decoded: Vec<(String, Table)> = payload
                    .table_names
                    .iter()
                    .zip(&payload.content)
                    .map(|(name, content)| (name.clone(), decode_table(content)))
                    .collect();
                let mut row = vec![
                    period,
                    event.id.to_string(),
                    time,
                    "Table record modification".to_string(),
                    subject,
                    payload.table_names.join(" "),
                ];
                row.extend(variable_names(&decoded));
                rows.push(row);
            }
            _ => {}
        }
    }
}

fn questionnaire_part(events: &[Event], rows: &mut Vec<Vec<String>>) {
    let responses: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e.kind, EventKind::QuesterDone { .. }))
        .collect();
    let Some(first) = responses.first() else {
        return;
    };
    let EventKind::QuesterDone { questions, .. } = &first.kind else {
        return;
    };
    let mut header = vec!["subject".to_string()];
    header.extend(questions.iter().cloned());
    rows.push(header);
    for event in responses {
        let EventKind::QuesterDone { answers, .. } = &event.kind else {
            continue;
        };
        let subject = event
            .source()
            .and_then(|s| s.parse::<i64>().ok())
            .map(|s| (s + 1).to_string())
            .unwrap_or_default();
        let mut row = vec![subject];
        row.extend(answers.iter().cloned());
        rows.push(row);
    }
}

fn strings(row: &[&str]) -> Vec<String> {
    row.iter().map(|s| s.to_string()).collect()
}
