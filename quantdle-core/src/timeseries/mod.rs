//! Time-series stages of the download pipeline.
//!
//! Modules include:
//! - `plan`: split a requested date range into bounded windows
//! - `assemble`: turn raw records into the ordered result table
//! - `util`: timestamp and numeric field parsing shared by the stages
/// Final assembly of downloaded records.
pub mod assemble;
/// Window planning for long date ranges.
pub mod plan;
/// Field parsing helpers.
pub mod util;
