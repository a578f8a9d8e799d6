//! Core types for the Dendro experiment-log replay toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Dendro workspace:
//! typed identifiers, the parsed [`Event`] model, the columnar
//! [`Table`] structure reconstruction operates on, and the error
//! taxonomy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod event;
pub mod id;
pub mod table;

pub use error::{ParseError, ReconstructError};
pub use event::{Event, EventKind, ModifyPayload};
pub use id::{EventId, Period, RecordBase, RecordNr};
pub use table::{Dataset, MergedRow, MergedTable, PeriodState, Table, PERIOD_COLUMN};
