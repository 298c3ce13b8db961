use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use quantdle_core::connector::{ArchiveFetcher, QuantdleConnector, SymbolCatalog, WindowResolver};
use quantdle_core::{
    ArchiveLocation, DateRange, Diagnostics, QuantdleError, RawRecord, SymbolInfo, Timeframe,
    Warning, extract_archive,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Mock connector for CI-safe demos. Serves deterministic zip archives built from static fixtures.
///
/// Special symbols:
/// - `FAIL`: window resolution fails with a request error.
/// - `TIMEOUT`: window resolution is delayed briefly, then reports an unknown symbol.
/// - `US500`: not included in the plan (entitlement warning).
/// - `FLAKY`: archives for odd years are corrupt.
/// - anything not in the fixture list: unknown symbol warning.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Stable connector name.
    pub const NAME: &'static str = "quantdle-mock";

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(symbol: &str) -> Result<(), QuantdleError> {
        match symbol {
            "FAIL" => Err(QuantdleError::request(
                format!("/data/{symbol}"),
                "forced failure: HTTP 500 Internal Server Error",
            )),
            "TIMEOUT" => {
                // Keep short to avoid slowing tests excessively
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl QuantdleConnector for MockConnector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_window_resolver(&self) -> Option<&dyn WindowResolver> {
        Some(self as &dyn WindowResolver)
    }

    fn as_archive_fetcher(&self) -> Option<&dyn ArchiveFetcher> {
        Some(self as &dyn ArchiveFetcher)
    }

    fn as_symbol_catalog(&self) -> Option<&dyn SymbolCatalog> {
        Some(self as &dyn SymbolCatalog)
    }
}

#[async_trait]
impl WindowResolver for MockConnector {
    async fn resolve(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        window: &DateRange,
        diag: &mut Diagnostics,
    ) -> Result<Vec<ArchiveLocation>, QuantdleError> {
        Self::maybe_fail_or_timeout(symbol).await?;
        let Some(fixture) = fixtures::symbols::by_symbol(symbol) else {
            diag.warn(Warning::SymbolNotFound {
                symbol: symbol.to_string(),
                timeframe,
            });
            return Ok(Vec::new());
        };
        if fixture.restricted {
            diag.warn(Warning::NotEntitled {
                symbol: symbol.to_string(),
                timeframe,
            });
            return Ok(Vec::new());
        }
        Ok(fixtures::archives::locations(fixture, timeframe, window))
    }
}

#[async_trait]
impl ArchiveFetcher for MockConnector {
    async fn fetch(
        &self,
        location: &ArchiveLocation,
        diag: &mut Diagnostics,
    ) -> Result<Vec<RawRecord>, QuantdleError> {
        let parsed = fixtures::archives::parse(location).ok_or_else(|| {
            QuantdleError::extract(location.as_str(), "HTTP 404 Not Found")
        })?;
        let fixture = fixtures::symbols::by_symbol(&parsed.symbol).ok_or_else(|| {
            QuantdleError::extract(location.as_str(), "HTTP 403 Forbidden")
        })?;

        let bytes = if fixture.flaky && parsed.start.year() % 2 != 0 {
            b"corrupt archive".to_vec()
        } else {
            fixtures::archives::archive_bytes(fixture, parsed.start, parsed.end)?
        };
        extract_archive(location, &bytes, diag)
    }
}

#[async_trait]
impl SymbolCatalog for MockConnector {
    async fn list_symbols(&self) -> Result<Vec<String>, QuantdleError> {
        Ok(fixtures::symbols::SYMBOLS
            .iter()
            .map(|f| f.symbol.to_string())
            .collect())
    }

    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo, QuantdleError> {
        fixtures::symbols::by_symbol(symbol)
            .map(fixtures::symbols::FixtureSymbol::info)
            .ok_or_else(|| {
                QuantdleError::request(
                    format!("/symbols/{symbol}/range"),
                    "HTTP 404 Not Found",
                )
            })
    }
}
