//! quantdle-http
//!
//! Public connector that implements `QuantdleConnector` on top of the Quantdle
//! REST service. Exposes window resolution (presigned archive URLs), archive
//! download with zip/JSON extraction, and symbol metadata.
#![warn(missing_docs)]

/// Builder and environment configuration for [`QuantdleHttp`].
pub mod builder;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use quantdle_core::{
    ArchiveLocation, Credentials, DateRange, Diagnostics, QuantdleError, RawRecord, SymbolInfo,
    Timeframe, Warning,
    connector::{ArchiveFetcher, QuantdleConnector, SymbolCatalog, WindowResolver},
    extract_archive,
};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use url::Url;

pub use builder::{ENV_API_KEY, ENV_API_KEY_ID, ENV_HOST, QuantdleHttpBuilder};

const HEADER_API_KEY: &str = "x-api-key";
const HEADER_API_KEY_ID: &str = "x-api-key-id";

/// Connector backed by the Quantdle HTTP service.
///
/// Cheap to share: the inner `reqwest::Client` is reference counted and only
/// read by concurrent fetches.
#[derive(Debug, Clone)]
pub struct QuantdleHttp {
    pub(crate) http: reqwest::Client,
    pub(crate) base: Url,
    pub(crate) credentials: Credentials,
    pub(crate) timeout: Duration,
}

#[derive(Deserialize)]
struct PresignedUrls {
    #[serde(default)]
    presigned_urls: Vec<String>,
}

#[derive(Deserialize)]
struct SymbolList {
    #[serde(default)]
    symbols: Vec<String>,
}

#[derive(Deserialize)]
struct SymbolRange {
    symbol: String,
    available_from: String,
    available_to: String,
}

impl QuantdleHttp {
    /// Stable connector name.
    pub const NAME: &'static str = "quantdle-http";

    /// Returns an unconfigured builder.
    #[must_use]
    pub fn builder() -> QuantdleHttpBuilder {
        QuantdleHttpBuilder::new()
    }

    /// Build with default configuration and the given credentials.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the credentials are empty.
    pub fn new(credentials: Credentials) -> Result<Self, QuantdleError> {
        Self::builder().credentials(credentials).build()
    }

    /// Build from `QUANTDLE_API_KEY`, `QUANTDLE_API_KEY_ID`, and optionally `QUANTDLE_HOST`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a required variable is missing.
    pub fn from_env() -> Result<Self, QuantdleError> {
        Self::builder().from_env()?.build()
    }

    /// Service base URL without a trailing slash.
    #[must_use]
    pub fn host(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // The builder rejects cannot-be-a-base hosts.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_service(&self, url: Url) -> Result<Response, QuantdleError> {
        let label = url.path().to_string();
        self.http
            .get(url)
            .header(HEADER_API_KEY, &self.credentials.api_key)
            .header(HEADER_API_KEY_ID, &self.credentials.api_key_id)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| QuantdleError::request(label, describe(&e, self.timeout)))
    }

    /// Map 401 and other non-success statuses for metadata calls.
    fn check_metadata_status(resp: &Response) -> Result<(), QuantdleError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(QuantdleError::Authentication(
                "invalid API key or API key id".into(),
            ));
        }
        Err(QuantdleError::request(
            resp.url().path(),
            format!("HTTP {status}"),
        ))
    }
}

fn describe(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        format!("timed out after {}s", timeout.as_secs_f64())
    } else {
        e.to_string()
    }
}

fn parse_service_date(field: &str, raw: &str) -> Result<NaiveDate, QuantdleError> {
    // Accept both plain dates and full timestamps.
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| QuantdleError::Data(format!("invalid {field} '{raw}': {e}")))
}

#[async_trait]
impl WindowResolver for QuantdleHttp {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "quantdle::http",
            skip(self, timeframe, window, diag),
            fields(timeframe = %timeframe, window = %window),
        )
    )]
    async fn resolve(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        window: &DateRange,
        diag: &mut Diagnostics,
    ) -> Result<Vec<ArchiveLocation>, QuantdleError> {
        let mut url = self.endpoint(&["data", symbol]);
        url.query_pairs_mut()
            .append_pair("timeframe", timeframe.code())
            .append_pair("start_date", &window.start.format("%Y-%m-%d").to_string())
            .append_pair("end_date", &window.end.format("%Y-%m-%d").to_string());
        let label = url.path().to_string();

        let resp = self.get_service(url).await?;
        match resp.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED => {
                return Err(QuantdleError::Authentication(
                    "invalid API key or API key id".into(),
                ));
            }
            StatusCode::FORBIDDEN => {
                diag.warn(Warning::NotEntitled {
                    symbol: symbol.to_string(),
                    timeframe,
                });
                return Ok(Vec::new());
            }
            StatusCode::NOT_FOUND => {
                diag.warn(Warning::SymbolNotFound {
                    symbol: symbol.to_string(),
                    timeframe,
                });
                return Ok(Vec::new());
            }
            s => return Err(QuantdleError::request(label, format!("HTTP {s}"))),
        }

        let body: PresignedUrls = resp
            .json()
            .await
            .map_err(|e| QuantdleError::request(&label, format!("invalid response body: {e}")))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "quantdle::http", locations = body.presigned_urls.len(), "window resolved");

        Ok(body
            .presigned_urls
            .into_iter()
            .map(ArchiveLocation::from)
            .collect())
    }
}

#[async_trait]
impl ArchiveFetcher for QuantdleHttp {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "quantdle::http",
            skip(self, location, diag),
            fields(location = %location),
        )
    )]
    async fn fetch(
        &self,
        location: &ArchiveLocation,
        diag: &mut Diagnostics,
    ) -> Result<Vec<RawRecord>, QuantdleError> {
        let fail = |msg: String| QuantdleError::extract(location.as_str(), msg);

        // Presigned URLs carry their own authorization; service headers are not sent.
        let resp = self
            .http
            .get(location.as_str())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| fail(describe(&e, self.timeout)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP {status}")));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| fail(format!("failed to read body: {}", describe(&e, self.timeout))))?;

        let owned = location.clone();
        let (records, local) = tokio::task::spawn_blocking(move || {
            let mut local = Diagnostics::new();
            let records = extract_archive(&owned, &bytes, &mut local);
            (records, local)
        })
        .await
        .map_err(|e| fail(format!("extraction task failed: {e}")))?;

        diag.absorb(local);
        records
    }
}

#[async_trait]
impl SymbolCatalog for QuantdleHttp {
    async fn list_symbols(&self) -> Result<Vec<String>, QuantdleError> {
        let url = self.endpoint(&["symbols"]);
        let label = url.path().to_string();
        let resp = self.get_service(url).await?;
        Self::check_metadata_status(&resp)?;
        let body: SymbolList = resp
            .json()
            .await
            .map_err(|e| QuantdleError::request(label, format!("invalid response body: {e}")))?;
        Ok(body.symbols)
    }

    async fn symbol_info(&self, symbol: &str) -> Result<SymbolInfo, QuantdleError> {
        let url = self.endpoint(&["symbols", symbol, "range"]);
        let label = url.path().to_string();
        let resp = self.get_service(url).await?;
        Self::check_metadata_status(&resp)?;
        let body: SymbolRange = resp
            .json()
            .await
            .map_err(|e| QuantdleError::request(label, format!("invalid response body: {e}")))?;
        Ok(SymbolInfo {
            symbol: body.symbol,
            available_from: parse_service_date("available_from", &body.available_from)?,
            available_to: parse_service_date("available_to", &body.available_to)?,
        })
    }
}

#[async_trait]
impl QuantdleConnector for QuantdleHttp {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "Quantdle"
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
