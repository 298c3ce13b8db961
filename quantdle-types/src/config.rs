//! Configuration types shared across the orchestrator and connectors.

use core::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default service host.
pub const DEFAULT_HOST: &str = "https://api.quantdle.com/hist/v1";

/// Representation of the final table handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Ordered candle records (always available).
    #[default]
    Records,
    /// A polars `DataFrame`. Requires the `dataframe` feature.
    DataFrame,
}

/// How the assembler treats candles sharing a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DuplicatePolicy {
    /// Keep every candle; duplicates stay adjacent in stable-sort order.
    #[default]
    Keep,
    /// Keep only the first candle for each timestamp after the stable sort.
    KeepFirst,
}

/// API credentials attached to every service request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Secret API key (`x-api-key`).
    pub api_key: String,
    /// Key identifier (`x-api-key-id`).
    pub api_key_id: String,
}

impl Credentials {
    /// Build credentials from a key and its identifier.
    pub fn new(api_key: impl Into<String>, api_key_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_key_id: api_key_id.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_key_id", &self.api_key_id)
            .finish()
    }
}

/// Transport configuration for the HTTP connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service base URL; a trailing slash is ignored.
    pub host: String,
    /// Deadline for every individual request (service call or archive download).
    pub request_timeout: Duration,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// Defaults applied to every download unless overridden per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Maximum simultaneous archive fetches within one window.
    pub concurrency: usize,
    /// Report progress through the configured progress sink.
    pub show_progress: bool,
    /// Maximum span of one window, in 365.25-day years.
    pub max_window_years: f64,
    /// Output representation.
    pub output: OutputFormat,
    /// Duplicate-timestamp handling in the assembler.
    pub duplicates: DuplicatePolicy,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            show_progress: true,
            max_window_years: 5.0,
            output: OutputFormat::Records,
            duplicates: DuplicatePolicy::Keep,
        }
    }
}
