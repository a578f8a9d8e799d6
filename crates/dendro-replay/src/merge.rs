//! The snapshot merger: concatenating per-period tables for export.

use dendro_core::{Dataset, PeriodState};

/// Merge the period chain into one [`MergedTable`](dendro_core::MergedTable)
/// per table name, concatenating rows in period order. Columns are the
/// outer union across periods (schema drift between periods is legal);
/// missing cells stay absent.
pub fn merge(states: &[PeriodState]) -> Dataset {
    let mut dataset = Dataset::default();
    for state in states {
        for (name, table) in &state.tables {
            dataset
                .tables
                .entry(name.clone())
                .or_default()
                .append_period(table);
        }
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use dendro_core::{Period, RecordNr, PeriodState};

    #[test]
    fn same_name_merges_across_periods() {
        let mut p0 = PeriodState::new(Period(0));
        p0.table_mut("subjects").set(RecordNr(0), "score", "10".into());
        let mut p1 = PeriodState::new(Period(1));
        p1.table_mut("subjects").set(RecordNr(0), "score", "30".into());
        p1.table_mut("contracts").set(RecordNr(0), "price", "5".into());

        let dataset = merge(&[p0, p1]);
        assert_eq!(dataset.tables.len(), 2);
        let subjects = dataset.table("subjects").unwrap();
        assert_eq!(subjects.rows.len(), 2);
        assert_eq!(subjects.get(0, "score"), Some("10"));
        assert_eq!(subjects.get(1, "score"), Some("30"));
        // Row labels repeat per period.
        assert_eq!(subjects.rows[0].record, subjects.rows[1].record);
    }

    #[test]
    fn schema_drift_merges_via_outer_union() {
        let mut p0 = PeriodState::new(Period(0));
        p0.table_mut("subjects").set(RecordNr(0), "a", "1".into());
        let mut p1 = PeriodState::new(Period(1));
        p1.table_mut("subjects").set(RecordNr(0), "b", "2".into());

        let dataset = merge(&[p0, p1]);
        let subjects = dataset.table("subjects").unwrap();
        assert_eq!(
            subjects.columns,
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(subjects.get(0, "b"), None);
        assert_eq!(subjects.get(1, "a"), None);
    }
}
