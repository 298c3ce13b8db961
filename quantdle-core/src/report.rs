#[cfg(feature = "dataframe")]
use crate::dataframe::ToDataFrame;
use crate::range::DateRange;
use crate::record::ResultTable;
use crate::{Capability, OutputFormat, QuantdleError, Warning};

/// The assembled table in the representation the caller asked for.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Table {
    /// Ordered candle records.
    Records(ResultTable),
    /// A polars `DataFrame` with the same nine columns.
    #[cfg(feature = "dataframe")]
    DataFrame(polars::prelude::DataFrame),
}

impl Table {
    /// Check that `format` can be produced by this build.
    ///
    /// # Errors
    /// Returns `Unsupported` for [`OutputFormat::DataFrame`] when the
    /// `dataframe` feature is disabled.
    pub fn ensure_supported(format: OutputFormat) -> Result<(), QuantdleError> {
        match format {
            OutputFormat::DataFrame if !cfg!(feature = "dataframe") => Err(
                QuantdleError::unsupported(Capability::DataFrameOutput.as_str()),
            ),
            _ => Ok(()),
        }
    }

    /// Convert an assembled table into `format`.
    ///
    /// # Errors
    /// Returns `Unsupported` if `format` is not compiled in, or `Data` if the
    /// dataframe conversion fails.
    pub fn convert(table: ResultTable, format: OutputFormat) -> Result<Self, QuantdleError> {
        Self::ensure_supported(format)?;
        match format {
            #[cfg(feature = "dataframe")]
            OutputFormat::DataFrame => Ok(Self::DataFrame(table.to_dataframe()?)),
            _ => Ok(Self::Records(table)),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Records(t) => t.len(),
            #[cfg(feature = "dataframe")]
            Self::DataFrame(df) => df.height(),
        }
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the records, if this is the records representation.
    #[must_use]
    pub const fn as_records(&self) -> Option<&ResultTable> {
        match self {
            Self::Records(t) => Some(t),
            #[cfg(feature = "dataframe")]
            Self::DataFrame(_) => None,
        }
    }

    /// Take the records, if this is the records representation.
    #[must_use]
    pub fn into_records(self) -> Option<ResultTable> {
        match self {
            Self::Records(t) => Some(t),
            #[cfg(feature = "dataframe")]
            Self::DataFrame(_) => None,
        }
    }

    /// Take the dataframe, if this is the dataframe representation.
    #[cfg(feature = "dataframe")]
    #[must_use]
    pub fn into_dataframe(self) -> Option<polars::prelude::DataFrame> {
        match self {
            Self::DataFrame(df) => Some(df),
            Self::Records(_) => None,
        }
    }
}

/// Outcome of a full download.
///
/// Wraps the assembled [`Table`] and any `warnings` captured while resolving,
/// fetching, or assembling.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    /// Assembled table in the requested representation.
    pub table: Table,
    /// Non-fatal issues encountered, in emission order.
    pub warnings: Vec<Warning>,
    /// Windows the request was split into, in processing order.
    pub windows: Vec<DateRange>,
    /// Total number of archive locations resolved across all windows.
    pub locations: usize,
}
