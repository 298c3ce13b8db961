use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the quantdle workspace.
///
/// Fatal conditions abort a download and surface to the caller. Recoverable
/// conditions never use this type directly; they are reported as
/// [`crate::Warning`]s (a failed archive fetch wraps its `Extract` error in
/// [`crate::Warning::FetchFailed`]).
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuantdleError {
    /// The requested start date is after the end date.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested first day (inclusive).
        start: NaiveDate,
        /// Requested last day (inclusive).
        end: NaiveDate,
    },

    /// Invalid input argument (bad date string, zero concurrency, ...).
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The service rejected the credentials (HTTP 401).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A service request failed: transport error, timeout, or a non-2xx status
    /// other than the ones mapped to warnings.
    #[error("request to {endpoint} failed: {msg}")]
    Request {
        /// Endpoint or URL the request was sent to.
        endpoint: String,
        /// Human-readable cause.
        msg: String,
    },

    /// Downloading, decompressing, or parsing one archive failed.
    #[error("failed to extract archive {location}: {msg}")]
    Extract {
        /// Archive location (URL) that failed.
        location: String,
        /// Human-readable cause.
        msg: String,
    },

    /// The connector does not provide the requested capability, or an optional
    /// output adapter is not compiled in.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// Capability label (e.g. "resolve", "output/dataframe").
        capability: String,
    },

    /// Issues with returned data that prevent assembling the result.
    #[error("data issue: {0}")]
    Data(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl QuantdleError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Request` error for an endpoint and message.
    pub fn request(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `Extract` error for an archive location and message.
    pub fn extract(location: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Extract {
            location: location.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build an `InvalidRange` error.
    #[must_use]
    pub const fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::InvalidRange { start, end }
    }

    /// Returns true if this error aborts a whole download.
    ///
    /// `Extract` failures are the only kind the orchestrator absorbs: the
    /// affected archive is dropped and the download continues.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Extract { .. })
    }
}
