use std::sync::Arc;

use futures::stream::{self, StreamExt};
use quantdle_core::connector::{ArchiveFetcher, SymbolCatalog, WindowResolver};
use quantdle_core::{
    Capability, DateInput, DateRange, Diagnostics, DownloadConfig, DuplicatePolicy, LogProgress,
    OutputFormat, ProgressSink, QuantdleConnector, QuantdleError, RawRecord, SymbolInfo, Table,
    Timeframe, Warning,
};

use crate::download::DownloadBuilder;

/// Orchestrator that plans, resolves, fetches, and assembles downloads through one connector.
pub struct Quantdle {
    pub(crate) connector: Arc<dyn QuantdleConnector>,
    pub(crate) cfg: DownloadConfig,
    pub(crate) progress: Arc<dyn ProgressSink>,
}

/// Builder for constructing a `Quantdle` orchestrator with custom defaults.
pub struct QuantdleBuilder {
    connector: Option<Arc<dyn QuantdleConnector>>,
    cfg: DownloadConfig,
    progress: Arc<dyn ProgressSink>,
}

impl Default for QuantdleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantdleBuilder {
    /// Create a new builder with the stock defaults.
    ///
    /// Behavior:
    /// - Starts without a connector; register one via [`Self::with_connector`].
    /// - Downloads default to 4 concurrent fetches, 5-year windows, record
    ///   output, progress through [`LogProgress`], and no deduplication.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cfg: DownloadConfig::default(),
            progress: Arc::new(LogProgress),
        }
    }

    /// Register the connector every request goes through. Replaces any previous one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn QuantdleConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Replace all download defaults at once.
    #[must_use]
    pub fn config(mut self, cfg: DownloadConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Default number of simultaneous archive fetches within a window.
    #[must_use]
    pub const fn concurrency(mut self, n: usize) -> Self {
        self.cfg.concurrency = n;
        self
    }

    /// Default for progress reporting.
    #[must_use]
    pub const fn show_progress(mut self, yes: bool) -> Self {
        self.cfg.show_progress = yes;
        self
    }

    /// Default maximum window span, in 365.25-day years.
    #[must_use]
    pub const fn max_window_years(mut self, years: f64) -> Self {
        self.cfg.max_window_years = years;
        self
    }

    /// Default output representation.
    #[must_use]
    pub const fn output(mut self, format: OutputFormat) -> Self {
        self.cfg.output = format;
        self
    }

    /// Default duplicate-timestamp policy.
    #[must_use]
    pub const fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.cfg.duplicates = policy;
        self
    }

    /// Install a custom progress sink (e.g. one driving a progress bar).
    #[must_use]
    pub fn progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Build the `Quantdle` orchestrator.
    ///
    /// Download settings are validated when a download runs, not here.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector has been registered.
    pub fn build(self) -> Result<Quantdle, QuantdleError> {
        let connector = self.connector.ok_or_else(|| {
            QuantdleError::InvalidArg(
                "no connector registered; add one via with_connector(...)".to_string(),
            )
        })?;
        Ok(Quantdle {
            connector,
            cfg: self.cfg,
            progress: self.progress,
        })
    }
}

impl Quantdle {
    /// Start building a new `Quantdle` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use quantdle::Quantdle;
    /// use quantdle_http::QuantdleHttp;
    ///
    /// let qd = Quantdle::builder()
    ///     .with_connector(Arc::new(QuantdleHttp::from_env()?))
    ///     .concurrency(8)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> QuantdleBuilder {
        QuantdleBuilder::new()
    }

    /// Name of the registered connector.
    #[must_use]
    pub fn connector_name(&self) -> &'static str {
        self.connector.name()
    }

    /// Download defaults applied to every request.
    #[must_use]
    pub const fn config(&self) -> &DownloadConfig {
        &self.cfg
    }

    /// Start a download with this instance's defaults.
    #[must_use]
    pub fn download(&self) -> DownloadBuilder<'_> {
        DownloadBuilder::new(self)
    }

    /// One-shot download returning only the assembled table.
    ///
    /// Warnings are logged (with the `tracing` feature) and otherwise dropped;
    /// use [`Self::download`] to receive them in a [`quantdle_core::DownloadReport`].
    ///
    /// # Errors
    /// Same as [`DownloadBuilder::run`].
    #[allow(clippy::too_many_arguments)]
    pub async fn download_data(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
        output: OutputFormat,
        concurrency: usize,
        show_progress: bool,
        max_window_years: f64,
    ) -> Result<Table, QuantdleError> {
        let report = self
            .download()
            .symbol(symbol)
            .timeframe(timeframe)
            .start(start)
            .end(end)
            .output(output)
            .concurrency(concurrency)
            .show_progress(show_progress)
            .max_window_years(max_window_years)
            .run()
            .await?;
        Ok(report.table)
    }

    /// Symbols available to the account.
    ///
    /// # Errors
    /// Returns `Unsupported` if the connector has no symbol catalog, otherwise
    /// whatever the connector reports.
    pub async fn list_symbols(&self) -> Result<Vec<String>, QuantdleError> {
        self.catalog(Capability::ListSymbols)?.list_symbols().await
    }

    /// Available date range for `symbol`.
    ///
    /// # Errors
    /// Returns `Unsupported` if the connector has no symbol catalog, otherwise
    /// whatever the connector reports.
    pub async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo, QuantdleError> {
        self.catalog(Capability::SymbolInfo)?.symbol_info(symbol).await
    }

    /// Download every archive covering one window.
    ///
    /// Behavior:
    /// - Resolves the window once. Zero locations returns an empty list without
    ///   fetching.
    /// - Fetches locations with at most `concurrency` in flight. Records are
    ///   concatenated in completion order.
    /// - A failed fetch drops only that location's records and records a
    ///   [`Warning::FetchFailed`] in `diag`.
    ///
    /// # Errors
    /// - `InvalidArg` if `concurrency` is zero.
    /// - `Unsupported` if the connector cannot resolve windows or fetch archives.
    /// - Any fatal error from the resolver (`Authentication`, `Request`).
    pub async fn download_window(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        window: &DateRange,
        concurrency: usize,
        show_progress: bool,
        diag: &mut Diagnostics,
    ) -> Result<Vec<RawRecord>, QuantdleError> {
        self.collect_window(symbol, timeframe, window, concurrency, show_progress, diag)
            .await
            .map(|(records, _)| records)
    }

    /// [`Self::download_window`] that also returns the number of resolved locations.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "quantdle::core::download_window",
            skip(self, timeframe, window, diag),
            fields(timeframe = %timeframe, window = %window),
        )
    )]
    pub(crate) async fn collect_window(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        window: &DateRange,
        concurrency: usize,
        show_progress: bool,
        diag: &mut Diagnostics,
    ) -> Result<(Vec<RawRecord>, usize), QuantdleError> {
        if concurrency == 0 {
            return Err(QuantdleError::InvalidArg(
                "concurrency must be at least 1".to_string(),
            ));
        }
        let resolver = self.resolver()?;
        let fetcher = self.fetcher()?;

        let locations = resolver.resolve(symbol, timeframe, window, diag).await?;
        let total = locations.len();
        if total == 0 {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "quantdle::core", "window resolved to no archives");
            return Ok((Vec::new(), 0));
        }

        let mut pending = stream::iter(locations)
            .map(move |location| async move {
                let mut local = Diagnostics::new();
                let result = fetcher.fetch(&location, &mut local).await;
                (location, result, local)
            })
            .buffer_unordered(concurrency);

        let mut records = Vec::new();
        let mut completed = 0;
        while let Some((location, result, local)) = pending.next().await {
            completed += 1;
            diag.absorb(local);
            match result {
                Ok(batch) => records.extend(batch),
                Err(error) => diag.warn(Warning::FetchFailed {
                    location: location.to_string(),
                    error,
                }),
            }
            if show_progress {
                self.progress.location_finished(completed, total);
            }
        }
        Ok((records, total))
    }

    pub(crate) fn resolver(&self) -> Result<&dyn WindowResolver, QuantdleError> {
        self.connector
            .as_window_resolver()
            .ok_or_else(|| unsupported(self.connector.name(), Capability::ResolveWindow))
    }

    pub(crate) fn fetcher(&self) -> Result<&dyn ArchiveFetcher, QuantdleError> {
        self.connector
            .as_archive_fetcher()
            .ok_or_else(|| unsupported(self.connector.name(), Capability::FetchArchive))
    }

    fn catalog(&self, capability: Capability) -> Result<&dyn SymbolCatalog, QuantdleError> {
        self.connector
            .as_symbol_catalog()
            .ok_or_else(|| unsupported(self.connector.name(), capability))
    }
}

fn unsupported(connector: &str, capability: Capability) -> QuantdleError {
    QuantdleError::unsupported(format!("{capability} ({connector})"))
}
