//! Tab-delimited file writing shared by the timeline and the exporter.

use std::fs::File;
use std::path::Path;

use crate::error::ReportError;

/// Write `rows` to `path` as tab-separated lines. Rows may have
/// different lengths (spreadsheet-style parts), so the writer runs in
/// flexible mode.
pub fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(file);
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
