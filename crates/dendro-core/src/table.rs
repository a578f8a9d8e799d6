//! Columnar table structures.
//!
//! Reconstruction materializes log state into [`Table`]s: an ordered
//! column list over a row-indexed sparse cell store. Rows are addressed
//! by [`RecordNr`] and exist exactly as long as at least one column
//! holds a cell for them, so dropping a column implicitly retires rows
//! that lived only in it.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use crate::id::{Period, RecordNr};

/// Name of the synthetic column tagging each row with its originating
/// period (1-based display value).
pub const PERIOD_COLUMN: &str = "Period";

/// A named column's cells, keyed by row.
pub type Column = BTreeMap<RecordNr, String>;

/// One relational table: ordered columns over sparse rows.
///
/// # Examples
///
/// ```
/// use dendro_core::{RecordNr, Table};
///
/// let mut t = Table::new();
/// t.set(RecordNr(0), "name", "Alice".to_string());
/// t.set(RecordNr(0), "score", "10".to_string());
/// t.set(RecordNr(1), "name", "Bob".to_string());
///
/// assert_eq!(t.get(RecordNr(0), "score"), Some("10"));
/// assert_eq!(t.get(RecordNr(1), "score"), None);
/// assert_eq!(t.row_count(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: IndexMap<String, Column>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert one cell, creating the column and row as needed.
    pub fn set(&mut self, record: RecordNr, column: &str, value: String) {
        self.columns
            .entry(column.to_string())
            .or_default()
            .insert(record, value);
    }

    /// Register a column without any cells, preserving insertion order.
    /// Existing cells of a same-named column are untouched.
    pub fn add_column(&mut self, column: &str) {
        self.columns.entry(column.to_string()).or_default();
    }

    /// Read one cell.
    pub fn get(&self, record: RecordNr, column: &str) -> Option<&str> {
        self.columns.get(column)?.get(&record).map(String::as_str)
    }

    /// Remove one cell, if present. The column itself stays even when
    /// it ends up empty, so column order is preserved.
    pub fn remove(&mut self, record: RecordNr, column: &str) -> Option<String> {
        self.columns.get_mut(column)?.remove(&record)
    }

    /// Replace a column wholesale: the column is dropped (retiring rows
    /// that lived only in it) and re-added with exactly `cells`.
    pub fn replace_column(&mut self, column: &str, cells: Column) {
        self.columns.shift_remove(column);
        self.columns.insert(column.to_string(), cells);
    }

    /// Ordered column names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Whether the table has a column of this name.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Cells of one column, if present.
    pub fn column(&self, column: &str) -> Option<&Column> {
        self.columns.get(column)
    }

    /// Ordered `(name, cells)` pairs over all columns.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// The set of rows holding at least one cell, in key order.
    pub fn record_nrs(&self) -> BTreeSet<RecordNr> {
        self.columns
            .values()
            .flat_map(|cells| cells.keys().copied())
            .collect()
    }

    /// Number of live rows.
    pub fn row_count(&self) -> usize {
        self.record_nrs().len()
    }

    /// Whether the table holds no columns at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Tag every live row's [`PERIOD_COLUMN`] with the period's display
    /// value, creating the column if absent.
    pub fn stamp_period(&mut self, period: Period) {
        let value = period.display_value().to_string();
        for record in self.record_nrs() {
            self.set(record, PERIOD_COLUMN, value.clone());
        }
    }
}

/// All tables materialized for one logical period.
///
/// Tables are created lazily on first reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodState {
    /// The period this state covers.
    pub period: Period,
    /// Table name to contents, in first-reference order.
    pub tables: IndexMap<String, Table>,
}

impl PeriodState {
    /// Create an empty state for `period`.
    pub fn new(period: Period) -> Self {
        Self {
            period,
            tables: IndexMap::new(),
        }
    }

    /// Access a table, creating it empty on first reference.
    pub fn table_mut(&mut self, name: &str) -> &mut Table {
        self.tables.entry(name.to_string()).or_default()
    }
}

/// One row of a merged output table: its record label and one optional
/// cell per merged column (parallel to [`MergedTable::columns`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedRow {
    /// The row's record number (retains per-period duplicates).
    pub record: RecordNr,
    /// Cells parallel to the merged column list; `None` = absent.
    pub cells: Vec<Option<String>>,
}

/// A table concatenated across periods for export.
///
/// Columns are the outer union across contributing periods, in
/// first-seen order; rows appear in period order and keep their
/// original record labels, so the same label may occur once per period.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedTable {
    /// Merged column names, first-seen order.
    pub columns: Vec<String>,
    /// Concatenated rows, period order.
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    /// Append one period's table, extending the column union. Rows
    /// already present are padded so `cells` stays parallel to
    /// `columns`.
    pub fn append_period(&mut self, table: &Table) {
        for name in table.column_names() {
            if !self.columns.iter().any(|c| c == name) {
                self.columns.push(name.to_string());
            }
        }
        for row in &mut self.rows {
            row.cells.resize(self.columns.len(), None);
        }
        for record in table.record_nrs() {
            let cells = self
                .columns
                .iter()
                .map(|c| table.get(record, c).map(str::to_string))
                .collect();
            self.rows.push(MergedRow { record, cells });
        }
    }

    /// Read one cell by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.cells.get(idx)?.as_deref()
    }
}

/// The reconstruction output: every table name seen in any period,
/// mapped to its concatenation across periods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Table name to merged contents, in first-seen order.
    pub tables: IndexMap<String, MergedTable>,
}

impl Dataset {
    /// Look up a merged table by name.
    pub fn table(&self, name: &str) -> Option<&MergedTable> {
        self.tables.get(name)
    }
}
