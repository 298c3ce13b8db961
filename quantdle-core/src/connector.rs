use async_trait::async_trait;

use crate::archive::ArchiveLocation;
use crate::diagnostics::Diagnostics;
use crate::range::DateRange;
use crate::record::RawRecord;
use crate::{QuantdleError, SymbolInfo, Timeframe};

/// Focused role trait for connectors that map a date window to archive locations.
#[async_trait]
pub trait WindowResolver: Send + Sync {
    /// Ask the service which archives cover `window` for `symbol` at `timeframe`.
    ///
    /// Entitlement (403) and unknown-symbol (404) responses are not errors:
    /// implementations record a warning in `diag` and return an empty list.
    ///
    /// # Errors
    /// - `Authentication` when the service rejects the credentials.
    /// - `Request` on transport failure, timeout, or any other non-2xx status.
    async fn resolve(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        window: &DateRange,
        diag: &mut Diagnostics,
    ) -> Result<Vec<ArchiveLocation>, QuantdleError>;
}

/// Focused role trait for connectors that download and unpack one archive.
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    /// Download the archive at `location` and return its records in entry order.
    ///
    /// # Errors
    /// Returns `Extract` when the download, decompression, or parse fails.
    async fn fetch(
        &self,
        location: &ArchiveLocation,
        diag: &mut Diagnostics,
    ) -> Result<Vec<RawRecord>, QuantdleError>;
}

/// Focused role trait for connectors that expose symbol metadata.
#[async_trait]
pub trait SymbolCatalog: Send + Sync {
    /// Symbols available to the account.
    async fn list_symbols(&self) -> Result<Vec<String>, QuantdleError>;

    /// Available date range for `symbol`.
    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo, QuantdleError>;
}

/// Main connector trait implemented by data sources.
///
/// Capabilities are discovered through the `as_*` accessors; a connector
/// returns `Some(self)` for every role it implements.
#[async_trait]
pub trait QuantdleConnector: Send + Sync {
    /// Stable identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Human-readable vendor name.
    fn vendor(&self) -> &'static str {
        "Unknown"
    }

    /// Window resolution capability.
    fn as_window_resolver(&self) -> Option<&dyn WindowResolver> {
        None
    }

    /// Archive download capability.
    fn as_archive_fetcher(&self) -> Option<&dyn ArchiveFetcher> {
        None
    }

    /// Symbol metadata capability.
    fn as_symbol_catalog(&self) -> Option<&dyn SymbolCatalog> {
        None
    }
}
