use crate::Quantdle;
use quantdle_core::{
    DateInput, DateRange, Diagnostics, DownloadConfig, DownloadReport, DuplicatePolicy,
    OutputFormat, QuantdleError, Table, Timeframe, assemble, plan,
};

/// Builder for one symbol/timeframe download over an arbitrary date range.
pub struct DownloadBuilder<'a> {
    pub(crate) client: &'a Quantdle,
    // Inputs are kept raw and validated in run(), so the builder never fails midway.
    pub(crate) symbol: Option<String>,
    pub(crate) timeframe: Option<Timeframe>,
    pub(crate) start: Option<DateInput>,
    pub(crate) end: Option<DateInput>,
    pub(crate) cfg: DownloadConfig,
}

impl<'a> DownloadBuilder<'a> {
    /// Create a new builder bound to a `Quantdle` instance, starting from its defaults.
    #[must_use]
    pub fn new(client: &'a Quantdle) -> Self {
        Self {
            client,
            symbol: None,
            timeframe: None,
            start: None,
            end: None,
            cfg: client.cfg.clone(),
        }
    }

    /// Symbol to download (e.g. "EURUSD").
    #[must_use]
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Candle timeframe.
    #[must_use]
    pub const fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    /// First day of the range (inclusive). Accepts `YYYY-MM-DD` strings and chrono values.
    #[must_use]
    pub fn start(mut self, start: impl Into<DateInput>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Last day of the range (inclusive). Accepts `YYYY-MM-DD` strings and chrono values.
    #[must_use]
    pub fn end(mut self, end: impl Into<DateInput>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Output representation.
    #[must_use]
    pub const fn output(mut self, format: OutputFormat) -> Self {
        self.cfg.output = format;
        self
    }

    /// Maximum simultaneous archive fetches within one window.
    #[must_use]
    pub const fn concurrency(mut self, n: usize) -> Self {
        self.cfg.concurrency = n;
        self
    }

    /// Report progress through the orchestrator's progress sink.
    #[must_use]
    pub const fn show_progress(mut self, yes: bool) -> Self {
        self.cfg.show_progress = yes;
        self
    }

    /// Maximum window span, in 365.25-day years.
    #[must_use]
    pub const fn max_window_years(mut self, years: f64) -> Self {
        self.cfg.max_window_years = years;
        self
    }

    /// Duplicate-timestamp policy for the assembler.
    #[must_use]
    pub const fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.cfg.duplicates = policy;
        self
    }

    /// Execute the download and assemble the result.
    ///
    /// Behavior and trade-offs:
    /// - Validates every input before the first network call.
    /// - Splits the range into windows of at most `max_window_years` and
    ///   processes them strictly one after another; archives within a window
    ///   are fetched concurrently.
    /// - Failed archives, entitlement and unknown-symbol responses, and an
    ///   empty result populate [`DownloadReport::warnings`] without aborting.
    ///
    /// # Errors
    /// - `InvalidArg` for a missing symbol, timeframe, or date, an unparsable
    ///   date string, zero concurrency, or a non-positive window span.
    /// - `InvalidRange` when start is after end.
    /// - `Unsupported` when the output format is not compiled in or the
    ///   connector lacks a required role.
    /// - `Authentication` or `Request` from window resolution (fatal).
    /// - `Data` when a downloaded record cannot be normalized.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "quantdle::download::run", skip(self))
    )]
    pub async fn run(self) -> Result<DownloadReport, QuantdleError> {
        let Self {
            client,
            symbol,
            timeframe,
            start,
            end,
            cfg,
        } = self;

        Table::ensure_supported(cfg.output)?;
        let symbol = symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| QuantdleError::InvalidArg("no symbol specified for download".into()))?;
        let timeframe = timeframe.ok_or_else(|| {
            QuantdleError::InvalidArg("no timeframe specified for download".into())
        })?;
        if cfg.concurrency == 0 {
            return Err(QuantdleError::InvalidArg(
                "concurrency must be at least 1".into(),
            ));
        }
        let start = start
            .ok_or_else(|| QuantdleError::InvalidArg("no start date specified".into()))?
            .resolve()?;
        let end = end
            .ok_or_else(|| QuantdleError::InvalidArg("no end date specified".into()))?
            .resolve()?;
        let range = DateRange::new(start, end)?;
        let windows = plan(range, cfg.max_window_years)?;
        client.resolver()?;
        client.fetcher()?;

        let mut diag = Diagnostics::new();
        let count = windows.len();
        if cfg.show_progress {
            client.progress.windows_planned(count);
        }

        let mut records = Vec::new();
        let mut locations = 0;
        for (index, window) in windows.iter().enumerate() {
            if cfg.show_progress {
                client.progress.window_started(index, count, window);
            }
            let (batch, resolved) = client
                .collect_window(
                    &symbol,
                    timeframe,
                    window,
                    cfg.concurrency,
                    cfg.show_progress,
                    &mut diag,
                )
                .await?;
            records.extend(batch);
            locations += resolved;
        }

        let table = assemble(records, cfg.duplicates, &mut diag)?;
        let table = Table::convert(table, cfg.output)?;

        Ok(DownloadReport {
            table,
            warnings: diag.into_warnings(),
            windows,
            locations,
        })
    }
}
