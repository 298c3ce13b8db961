//! quantdle-core
//!
//! Core types, traits, and pure pipeline stages shared across the quantdle
//! workspace.
//!
//! - `types`: re-exports of the foundational types from `quantdle-types`.
//! - `range`: inclusive date ranges and caller date inputs.
//! - `connector`: the `QuantdleConnector` trait and its role traits
//!   (`WindowResolver`, `ArchiveFetcher`, `SymbolCatalog`).
//! - `archive`: archive locations and zip/JSON extraction.
//! - `record`: raw records, candles, and the assembled `ResultTable`.
//! - `timeseries`: window planning and final assembly.
//! - `diagnostics`: warning accumulation and progress reporting.
//! - `report`: the `Table` output adapter and `DownloadReport` envelope.
//!
//! Nothing in this crate performs I/O; network access lives behind the
//! connector traits.
#![warn(missing_docs)]

/// Archive locations and zip extraction.
pub mod archive;
/// Connector capability traits and the primary `QuantdleConnector` interface.
pub mod connector;
/// Optional polars adapter for the assembled table.
#[cfg(feature = "dataframe")]
pub mod dataframe;
/// Warning accumulation and progress reporting.
pub mod diagnostics;
/// Date ranges and caller-supplied date inputs.
pub mod range;
/// Raw records and assembled candles.
pub mod record;
/// Output adapter and download report envelope.
pub mod report;
/// Window planning and assembly of downloaded records.
pub mod timeseries;
pub mod types;

pub use archive::{ArchiveLocation, ArchivePayload, extract_archive};
#[cfg(feature = "dataframe")]
pub use dataframe::ToDataFrame;
pub use connector::{ArchiveFetcher, QuantdleConnector, SymbolCatalog, WindowResolver};
pub use diagnostics::{Diagnostics, LogProgress, ProgressSink};
pub use range::{DAYS_PER_YEAR, DateInput, DateRange};
pub use record::{COLUMNS, Candle, RawRecord, ResultTable};
pub use report::{DownloadReport, Table};
pub use timeseries::assemble::assemble;
pub use timeseries::plan::plan;
pub use types::*;
