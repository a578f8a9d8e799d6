//! Property tests for the replay engine: idempotence, monotonic
//! growth across cutoffs, and row-sparseness of modify events.

use proptest::prelude::*;

use dendro_core::{Dataset, EventId, PERIOD_COLUMN};
use dendro_replay::{parse_log, reconstruct, table_event_ids, ReconstructOptions};

const COLUMNS: [&str; 3] = ["price", "quantity", "profit"];

/// One generated cell write: (record, column index, value).
type Write = (i64, usize, String);

fn write_strategy() -> impl Strategy<Value = Write> {
    (0i64..6, 0usize..COLUMNS.len(), "[a-z0-9]{1,6}")
}

/// Build a log seeding a `subjects` table, then one modify event per
/// generated write. Event ids are 2, 4, 6, ...
fn build_log(writes: &[Write]) -> String {
    let mut log = String::from(
        "2\tCGEMS_PGX_DBReplace\ttarget\t0\n\
         2\tCGEMS_PGX_DBReplace\tm_period\t0\n\
         2\tCGEMS_PGX_DBReplace\t\tTABLE\tsubjects\n\
         2\tCGEMS_PGX_DBReplace\t\tname\n\
         2\tCGEMS_PGX_DBReplace\t\ts1\n\
         2\tCGEMS_PGX_DBReplace\t\ts2\n\
         2\tCGEMS_PGX_DBReplace\t\ts3\n\
         2\tCGEMS_PGX_DBReplace\t\ts4\n\
         2\tCGEMS_PGX_DBReplace\t\ts5\n\
         2\tCGEMS_PGX_DBReplace\t\ts6\n",
    );
    for (i, (record, column, value)) in writes.iter().enumerate() {
        let id = 4 + 2 * i as u64;
        let column = COLUMNS[*column];
        log.push_str(&format!(
            "{id}\tCGEMS_PGX_DBModify\ttime\t09:01:00\n\
             {id}\tCGEMS_PGX_DBModify\tm_period\t0\n\
             {id}\tCGEMS_PGX_DBModify\tm_operation\tupdate\n\
             {id}\tCGEMS_PGX_DBModify\tm_DB\tsubjects\n\
             {id}\tCGEMS_PGX_DBModify\tm_recordNrs\t{record}\n\
             {id}\tCGEMS_PGX_DBModify\t\t{column}\n\
             {id}\tCGEMS_PGX_DBModify\t\t{value}\n"
        ));
    }
    log
}

/// Every row of `small` must exist in `big` with at least the same
/// non-empty cells (values may have been overwritten since).
fn grows_into(small: &Dataset, big: &Dataset) -> bool {
    small.tables.iter().all(|(name, small_table)| {
        let Some(big_table) = big.table(name) else {
            return false;
        };
        small_table.rows.iter().all(|small_row| {
            big_table.rows.iter().any(|big_row| {
                big_row.record == small_row.record
                    && small_table.columns.iter().enumerate().all(|(i, column)| {
                        small_row.cells[i].is_none()
                            || big_table
                                .columns
                                .iter()
                                .position(|c| c == column)
                                .and_then(|j| big_row.cells[j].as_ref())
                                .is_some()
                    })
            })
        })
    })
}

proptest! {
    #[test]
    fn reconstruction_is_idempotent(writes in proptest::collection::vec(write_strategy(), 1..16)) {
        let log = build_log(&writes);
        let events = parse_log(&log).unwrap();
        let options = ReconstructOptions::default();
        let last = *table_event_ids(&events).last().unwrap();
        let first = reconstruct(&events, last, &options).unwrap();
        let second = reconstruct(&events, last, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn datasets_grow_monotonically(writes in proptest::collection::vec(write_strategy(), 2..16)) {
        let log = build_log(&writes);
        let events = parse_log(&log).unwrap();
        let options = ReconstructOptions::default();
        let cutoffs = table_event_ids(&events);
        for pair in cutoffs.windows(2) {
            let small = reconstruct(&events, pair[0], &options).unwrap();
            let big = reconstruct(&events, pair[1], &options).unwrap();
            prop_assert!(grows_into(&small, &big));
        }
    }

    #[test]
    fn modify_touches_only_its_records(writes in proptest::collection::vec(write_strategy(), 2..16)) {
        let log = build_log(&writes);
        let events = parse_log(&log).unwrap();
        let options = ReconstructOptions::default();
        let cutoffs = table_event_ids(&events);
        let before = reconstruct(&events, cutoffs[cutoffs.len() - 2], &options).unwrap();
        let after = reconstruct(&events, cutoffs[cutoffs.len() - 1], &options).unwrap();
        let touched = writes[writes.len() - 1].0;

        let b = before.table("subjects").unwrap();
        let a = after.table("subjects").unwrap();
        for row in &b.rows {
            if row.record.0 == touched {
                continue;
            }
            let after_row = a
                .rows
                .iter()
                .find(|r| r.record == row.record)
                .expect("rows are never retracted");
            for (i, column) in b.columns.iter().enumerate() {
                if column == PERIOD_COLUMN {
                    continue;
                }
                let after_cell = a
                    .columns
                    .iter()
                    .position(|c| c == column)
                    .and_then(|j| after_row.cells[j].clone());
                prop_assert_eq!(row.cells[i].clone(), after_cell);
            }
        }
    }
}

#[test]
fn empty_selection_reports_the_cutoff() {
    let events = parse_log("1\tCGESMClientInfo\ttime\t09:00:00\n").unwrap();
    let err = reconstruct(&events, EventId(0), &ReconstructOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "no table-affecting events at or before cutoff 0");
}
