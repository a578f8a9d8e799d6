//! Event-log parsing and point-in-time table reconstruction.
//!
//! Replays a tab-delimited experiment log into materialized table
//! snapshots at arbitrary cutoff points. The pipeline runs strictly
//! forward:
//!
//! ```text
//! raw lines → Events → filtered Events → per-period tables → merged dataset
//! ```
//!
//! - [`parse_log`] folds raw lines into the ordered [`Event`] sequence
//! - [`decode_table`] / [`decode_replace_payload`] decode embedded
//!   table payload blocks
//! - [`table_events`] / [`table_event_ids`] select the table-affecting
//!   subsequence
//! - [`reconstruct`] replays a selection into one merged
//!   [`Dataset`](dendro_core::Dataset)
//!
//! The parsed event sequence is immutable; every cutoff request is an
//! independent, read-only replay over it.
//!
//! [`Event`]: dendro_core::Event

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod merge;
pub mod parse;
pub mod reconstruct;
pub mod select;

pub use block::{decode_replace_payload, decode_table};
pub use merge::merge;
pub use parse::parse_log;
pub use reconstruct::{reconstruct, replay_periods, ReconstructOptions};
pub use select::{is_table_event, table_event_ids, table_events};
