/*!
Normalization of Nevada election result files.

The result files published for Nevada elections have one row per candidate,
office and jurisdiction. This crate turns those rows into [`NormalizedResult`]
records:

- [`OfficeFilter`] drops the rows of offices that are not tracked,
- [`parser`] splits the office text into office, district and primary party,
- [`RecordBuilder`] assembles one record per row,
- [`Loader`] runs a whole file and hands the records to a [`ResultSink`] in a single batch.

Reading the files themselves is left to the caller: a loader consumes any iterator of
[`RawRow`]s. See the [`manual`] for the formats.
*/

mod config;
pub mod builder;
pub mod filter;
pub mod loader;
pub mod manual;
pub mod parser;
pub mod text;

pub use crate::builder::{Jurisdiction, RecordBuilder};
pub use crate::config::*;
pub use crate::filter::OfficeFilter;
pub use crate::loader::{ElectionId, LoadSummary, Loader, MemorySink, ResultSink};
pub use crate::parser::OfficeFormat;
