//! Dataset export: one tab-delimited file per (cutoff, table) pair.

use std::path::{Path, PathBuf};

use dendro_core::{Dataset, EventId, MergedTable};

use crate::error::ReportError;
use crate::writer::write_rows;

/// Serialize every table of `dataset` into `dir`, named
/// `<cutoff>_<table>.txt`. The leading unnamed column carries each
/// row's record label; absent cells become empty fields. Returns the
/// written paths in table order.
pub fn write_dataset(
    dataset: &Dataset,
    cutoff: EventId,
    dir: &Path,
) -> Result<Vec<PathBuf>, ReportError> {
    let mut written = Vec::new();
    for (name, table) in &dataset.tables {
        let path = dir.join(format!("{cutoff}_{name}.txt"));
        write_rows(&path, &table_rows(table))?;
        written.push(path);
    }
    Ok(written)
}

fn table_rows(table: &MergedTable) -> Vec<Vec<String>> {
    let mut header = vec![String::new()];
    header.extend(table.columns.iter().cloned());
    let mut rows = vec![header];
    for row in &table.rows {
        let mut line = vec![row.record.to_string()];
        line.extend(
            row.cells
                .iter()
                .map(|cell| cell.clone().unwrap_or_default()),
        );
        rows.push(line);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use dendro_replay::{parse_log, reconstruct, ReconstructOptions};

    const LOG: &str = "2\tCGEMS_PGX_DBReplace\ttarget\t0\n\
                       2\tCGEMS_PGX_DBReplace\tm_period\t0\n\
                       2\tCGEMS_PGX_DBReplace\t\tTABLE\tsubjects\n\
                       2\tCGEMS_PGX_DBReplace\t\tname\tscore\n\
                       2\tCGEMS_PGX_DBReplace\t\tAlice\t10\n\
                       2\tCGEMS_PGX_DBReplace\t\tBob\t20\n";

    #[test]
    fn files_are_named_by_cutoff_and_table() {
        let events = parse_log(LOG).unwrap();
        let dataset = reconstruct(&events, EventId(2), &ReconstructOptions::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let written = write_dataset(&dataset, EventId(2), dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("2_subjects.txt"));

        let body = std::fs::read_to_string(&written[0]).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "\tname\tscore\tPeriod");
        assert_eq!(lines[1], "0\tAlice\t10\t1");
        assert_eq!(lines[2], "1\tBob\t20\t1");
    }
}
