use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{QuantdleError, Timeframe};

/// A recoverable condition encountered while downloading.
///
/// Warnings never abort a download. They degrade the result (fewer or zero
/// records) and are handed back to the caller alongside the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Warning {
    /// The symbol is not included in the caller's plan (HTTP 403).
    NotEntitled {
        /// Requested symbol.
        symbol: String,
        /// Requested timeframe.
        timeframe: Timeframe,
    },
    /// The service does not know the symbol/timeframe pair (HTTP 404).
    SymbolNotFound {
        /// Requested symbol.
        symbol: String,
        /// Requested timeframe.
        timeframe: Timeframe,
    },
    /// One archive could not be fetched or extracted; its records were dropped.
    FetchFailed {
        /// Archive location that failed.
        location: String,
        /// Underlying failure.
        error: QuantdleError,
    },
    /// An archive entry held neither a record list nor a `data`-wrapped list.
    MalformedEntry {
        /// Archive location containing the entry.
        location: String,
        /// Entry name inside the archive.
        entry: String,
    },
    /// An archive contained no `.json` entries.
    NoEligibleEntries {
        /// Archive location.
        location: String,
    },
    /// No records were downloaded at all.
    NoData,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEntitled { symbol, timeframe } => write!(
                f,
                "{symbol} ({timeframe}) is not included in your current plan; skipping window"
            ),
            Self::SymbolNotFound { symbol, timeframe } => write!(
                f,
                "no data available for {symbol} ({timeframe}); check symbol and timeframe"
            ),
            Self::FetchFailed { location, error } => {
                write!(f, "failed to download from {location}: {error}")
            }
            Self::MalformedEntry { location, entry } => {
                write!(f, "unexpected JSON structure in {entry} from {location}")
            }
            Self::NoEligibleEntries { location } => {
                write!(f, "no JSON files found in archive from {location}")
            }
            Self::NoData => f.write_str(
                "no data was downloaded; check your date range and symbol availability",
            ),
        }
    }
}
