//! Human-facing projections of reconstructed experiment data.
//!
//! Two consumers of the core's interfaces live here, outside the
//! replay engine itself:
//!
//! - [`write_timeline`] projects the full event sequence into a
//!   four-part experiment history (connections, parameters, table
//!   changes, questionnaire responses);
//! - [`write_dataset`] serializes a reconstructed
//!   [`Dataset`](dendro_core::Dataset) to one tab-delimited file per
//!   table.
//!
//! Both write tab-separated text. The original tooling emitted a
//! spreadsheet for the timeline; a delimited file keeps the exporter
//! dependency-light and diff-friendly.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod timeline;
mod writer;

pub use error::ReportError;
pub use export::write_dataset;
pub use timeline::{timeline_rows, write_timeline};
