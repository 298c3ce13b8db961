//! Quantdle downloads historical OHLCV candles in provider-sized chunks.
//!
//! Overview
//! - Splits an arbitrary date range into windows of at most `max_window_years`
//!   (default 5) and processes them one after another.
//! - Resolves each window to archive locations through a connector that
//!   implements the `quantdle_core` contracts, then fetches those archives
//!   concurrently (bounded by `concurrency`, default 4).
//! - Tolerates partial failure: a failed archive is reported as a warning and
//!   only its records are dropped. Entitlement and unknown-symbol responses
//!   degrade to empty windows. Bad credentials and transport failures abort.
//! - Assembles everything into one chronologically ordered table, optionally
//!   converted to a polars `DataFrame` (`dataframe` feature).
//!
//! Key behaviors and trade-offs
//! - Windows are sequential; only archive fetches inside a window run in
//!   parallel. A large range costs one resolver round-trip per window.
//! - Duplicate timestamps from overlapping archives are kept by default
//!   (`DuplicatePolicy::Keep`); opt into `DuplicatePolicy::KeepFirst` to keep
//!   only the earliest occurrence.
//! - There is no call-level deadline. Each request carries the connector's own
//!   timeout; retries are left to the caller.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use quantdle::{Quantdle, Timeframe};
//! use quantdle_http::QuantdleHttp;
//!
//! let qd = Quantdle::builder()
//!     .with_connector(Arc::new(QuantdleHttp::from_env()?))
//!     .build()?;
//!
//! let report = qd
//!     .download()
//!     .symbol("EURUSD")
//!     .timeframe(Timeframe::H1)
//!     .start("2015-01-01")
//!     .end("2024-12-31")
//!     .run()
//!     .await?;
//! for w in &report.warnings {
//!     eprintln!("warning: {w}");
//! }
//! println!("{} candles", report.table.len());
//! ```
//!
//! See `demos/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod download;

pub use core::{Quantdle, QuantdleBuilder};
pub use download::DownloadBuilder;

// Re-export core types for convenience
pub use quantdle_core::{
    ArchiveLocation, Candle, Capability, ClientConfig, Credentials, DateInput, DateRange,
    Diagnostics, DownloadConfig, DownloadReport, DuplicatePolicy, LogProgress, OutputFormat,
    ProgressSink, QuantdleConnector, QuantdleError, RawRecord, ResultTable, SymbolInfo, Table,
    Timeframe, Warning,
};
#[cfg(feature = "dataframe")]
pub use quantdle_core::ToDataFrame;
