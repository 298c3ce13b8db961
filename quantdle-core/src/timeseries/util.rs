//! Shared helpers for interpreting raw record fields.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};


const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Parse a `date` and `time` pair joined by a single space.
///
/// Accepts `HH:MM:SS` with optional fractional seconds, or `HH:MM`.
#[must_use]
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let joined = format!("{} {}", date.trim(), time.trim());
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
}

/// Read an optional floating-point field from a number or numeric string.
///
/// Missing, null and non-numeric values all read as `None`.
#[must_use]
pub fn read_f64(fields: &Map<String, Value>, name: &str) -> Option<f64> {
    match fields.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Read an optional integer field; integral floats such as `100.0` are accepted.
///
/// Fractional, out-of-range and non-numeric values read as `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn read_i64(fields: &Map<String, Value>, name: &str) -> Option<i64> {
    let integral =
        |v: f64| (v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15).then(|| v as i64);
    match fields.get(name)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

/// Read an optional 32-bit integer field; values outside `i32` read as `None`.
#[must_use]
pub fn read_i32(fields: &Map<String, Value>, name: &str) -> Option<i32> {
    read_i64(fields, name).and_then(|v| i32::try_from(v).ok())
}
