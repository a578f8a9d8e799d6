//! Dendro: replay z-Tree GameSafe experiment logs into point-in-time
//! data tables.
//!
//! This is the top-level facade crate re-exporting the public API of
//! the Dendro sub-crates. For most users, depending on `dendro` alone
//! is sufficient.
//!
//! # Quick start
//!
//! ```
//! use dendro::prelude::*;
//!
//! let log = "2\tCGEMS_PGX_DBReplace\ttarget\t0\n\
//!            2\tCGEMS_PGX_DBReplace\tm_period\t0\n\
//!            2\tCGEMS_PGX_DBReplace\t\tTABLE\tsubjects\n\
//!            2\tCGEMS_PGX_DBReplace\t\tname\tscore\n\
//!            2\tCGEMS_PGX_DBReplace\t\tAlice\t10\n";
//!
//! let events = parse_log(log).unwrap();
//! let dataset = reconstruct(&events, EventId(2), &ReconstructOptions::default()).unwrap();
//! let subjects = dataset.table("subjects").unwrap();
//! assert_eq!(subjects.get(0, "score"), Some("10"));
//! assert_eq!(subjects.get(0, "Period"), Some("1"));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use dendro_core as types;
pub use dendro_replay as replay;
pub use dendro_report as report;

/// The most commonly used types and operations in one import.
pub mod prelude {
    pub use dendro_core::{
        Dataset, Event, EventId, EventKind, MergedTable, ParseError, Period, PeriodState,
        ReconstructError, RecordBase, RecordNr, Table, PERIOD_COLUMN,
    };
    pub use dendro_replay::{
        decode_replace_payload, decode_table, parse_log, reconstruct, replay_periods,
        table_event_ids, table_events, ReconstructOptions,
    };
    pub use dendro_report::{write_dataset, write_timeline, ReportError};
}

pub use prelude::*;
