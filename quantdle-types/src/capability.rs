use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for connector roles, errors, and telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Resolve a date window to archive locations.
    ResolveWindow,
    /// Download and extract one archive.
    FetchArchive,
    /// List symbols available to the account.
    ListSymbols,
    /// Available date range for one symbol.
    SymbolInfo,
    /// Secondary (dataframe) output adapter.
    DataFrameOutput,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResolveWindow => "resolve-window",
            Self::FetchArchive => "fetch-archive",
            Self::ListSymbols => "list-symbols",
            Self::SymbolInfo => "symbol-info",
            Self::DataFrameOutput => "output:dataframe",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
