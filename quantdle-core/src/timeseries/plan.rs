use chrono::Days;

use crate::QuantdleError;
use crate::range::{DAYS_PER_YEAR, DateRange};

/// Split a requested range into consecutive windows no wider than `max_span_years`.
///
/// - A range spanning at most `max_span_years` (in 365.25-day years) is
///   returned unchanged as a single window.
/// - Otherwise windows are `round(max_span_years * 365.25)` days wide
///   (`end - start`), each starting the day after the previous one ends. The
///   last window is clipped to the requested end.
///
/// Windows are returned in chronological order; they never overlap, never
/// leave a gap, and together cover exactly `[range.start, range.end]`.
///
/// # Errors
/// - `InvalidRange` if `range.start` is after `range.end`.
/// - `InvalidArg` if `max_span_years` is not a positive finite number.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn plan(range: DateRange, max_span_years: f64) -> Result<Vec<DateRange>, QuantdleError> {
    range.validate()?;
    if !max_span_years.is_finite() || max_span_years <= 0.0 {
        return Err(QuantdleError::InvalidArg(format!(
            "max window span must be a positive number of years, got {max_span_years}"
        )));
    }
    if range.span_years() <= max_span_years {
        return Ok(vec![range]);
    }

    // span_years > max_span_years > 0 keeps this finite and non-negative
    let step = Days::new((max_span_years * DAYS_PER_YEAR).round() as u64);
    let mut windows = Vec::new();
    let mut start = range.start;
    loop {
        let end = start
            .checked_add_days(step)
            .map_or(range.end, |d| d.min(range.end));
        windows.push(DateRange { start, end });
        if end >= range.end {
            break;
        }
        match end.succ_opt() {
            Some(next) => start = next,
            None => break,
        }
    }
    Ok(windows)
}
