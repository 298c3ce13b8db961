use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::QuantdleError;

/// Length of one year, in days, used for every span computation.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Inclusive calendar-date range `[start, end]`.
///
/// Used for the caller's overall request and for every window derived from it.
/// Construct with [`DateRange::new`] to enforce `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a validated range.
    ///
    /// # Errors
    /// Returns `InvalidRange` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, QuantdleError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Check the `start <= end` invariant.
    ///
    /// # Errors
    /// Returns `InvalidRange` when `start` is after `end`.
    pub fn validate(&self) -> Result<(), QuantdleError> {
        if self.start > self.end {
            return Err(QuantdleError::invalid_range(self.start, self.end));
        }
        Ok(())
    }

    /// Distance between the bounds in days (`end - start`); a single-day range spans 0.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }

    /// Span in fractional 365.25-day years.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn span_years(&self) -> f64 {
        self.span_days() as f64 / DAYS_PER_YEAR
    }

    /// Number of calendar days covered, bounds included.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        self.span_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// A date supplied by the caller: an ISO `YYYY-MM-DD` string or a native value.
///
/// Strings are parsed lazily by [`DateInput::resolve`] so builders can defer
/// validation until the request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// ISO calendar date, e.g. `"2023-01-31"`.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date-time; only its calendar date is used.
    DateTime(NaiveDateTime),
}

impl DateInput {
    /// Resolve to a calendar date.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a text date is not formatted as `YYYY-MM-DD`.
    pub fn resolve(&self) -> Result<NaiveDate, QuantdleError> {
        match self {
            Self::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
                QuantdleError::InvalidArg(format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
            }),
            Self::Date(d) => Ok(*d),
            Self::DateTime(dt) => Ok(dt.date()),
        }
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.naive_local())
    }
}
