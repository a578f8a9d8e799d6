//! Decoding of embedded table payload blocks.
//!
//! Two formats occur in the log: a bare table dump (header line of
//! tab-separated column names followed by data lines), and the full
//! replace payload, which interleaves several dumps behind
//! `TABLE<TAB><name>` marker lines.

use indexmap::IndexMap;

use dendro_core::{RecordNr, Table};

/// Marker prefix opening a table segment inside a replace payload.
const TABLE_MARKER: &str = "TABLE";

/// Decode a bare table dump.
///
/// The first line names the columns; each following non-empty line is
/// one row, keyed by its 0-based position. A row shorter than the
/// header simply leaves the trailing cells absent.
///
/// # Examples
///
/// ```
/// use dendro_core::RecordNr;
/// use dendro_replay::decode_table;
///
/// let t = decode_table("name\tscore\nAlice\t10\nBob\t20\n");
/// assert_eq!(t.get(RecordNr(0), "name"), Some("Alice"));
/// assert_eq!(t.get(RecordNr(1), "score"), Some("20"));
/// ```
pub fn decode_table(text: &str) -> Table {
    let mut lines = text.trim_end().lines();
    let mut table = Table::new();
    let Some(header) = lines.next() else {
        return table;
    };
    let columns: Vec<&str> = header.split('\t').map(str::trim_end).collect();
    // The header alone defines the schema; a dump with no data lines
    // still yields its columns.
    for column in &columns {
        table.add_column(column);
    }
    for (row, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let record = RecordNr(row as i64);
        for (cell, column) in line.split('\t').zip(columns.iter().copied()) {
            table.set(record, column, cell.trim_end().to_string());
        }
    }
    table
}

/// Decode a full-replace payload into named tables.
///
/// The buffer is split into per-table segments at `TABLE<TAB><name>`
/// marker lines; a repeated marker for the same name resets that
/// segment. Segments with empty bodies are discarded; the rest decode
/// independently. Output order equals marker order.
pub fn decode_replace_payload(text: &str) -> Vec<(String, Table)> {
    let mut segments: IndexMap<String, String> = IndexMap::new();
    let mut current: Option<String> = None;
    for line in text.trim_end().lines() {
        if line.starts_with(TABLE_MARKER) {
            let name = line
                .trim_end()
                .split('\t')
                .nth(1)
                .unwrap_or_default()
                .to_string();
            segments.insert(name.clone(), String::new());
            current = Some(name);
        } else if let Some(name) = &current {
            if let Some(body) = segments.get_mut(name) {
                body.push_str(line);
                body.push('\n');
            }
        }
    }
    segments
        .into_iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(name, body)| (name, decode_table(&body)))
        .collect()
}
