use std::io::{Cursor, Write};

use chrono::{Datelike, Days, NaiveDate};
use quantdle_core::{ArchiveLocation, DateRange, QuantdleError, Timeframe};
use serde_json::{Value, json};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::symbols::FixtureSymbol;

const SCHEME: &str = "mock://";

/// One location per calendar year of `window` that overlaps the symbol's availability.
pub fn locations(
    fixture: &FixtureSymbol,
    timeframe: Timeframe,
    window: &DateRange,
) -> Vec<ArchiveLocation> {
    let start = window.start.max(fixture.available_from());
    let end = window.end.min(fixture.available_to());
    let mut out = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let year_end = NaiveDate::from_ymd_opt(cursor.year(), 12, 31).unwrap_or(end);
        let chunk_end = year_end.min(end);
        out.push(ArchiveLocation::new(format!(
            "{SCHEME}{}/{}/{}/{}",
            fixture.symbol,
            timeframe.code(),
            cursor.format("%Y-%m-%d"),
            chunk_end.format("%Y-%m-%d"),
        )));
        match chunk_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    out
}

/// Parsed fixture location.
pub struct ParsedLocation {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn parse(location: &ArchiveLocation) -> Option<ParsedLocation> {
    let rest = location.as_str().strip_prefix(SCHEME)?;
    let mut parts = rest.split('/');
    let symbol = parts.next()?.to_string();
    let _timeframe = parts.next()?;
    let start = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    if parts.next().is_some() || start > end {
        return None;
    }
    Some(ParsedLocation { symbol, start, end })
}

/// Build a zip archive with one daily bar per day in `[start, end]`.
///
/// Even years use the `data`-wrapped entry shape, odd years a flat array.
pub fn archive_bytes(
    fixture: &FixtureSymbol,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<u8>, QuantdleError> {
    let mut rows = Vec::new();
    let mut day = start;
    let mut i: u32 = 0;
    while day <= end {
        rows.push(bar(fixture.base_price, day, i));
        i = i.wrapping_add(1);
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    let doc = if start.year() % 2 == 0 {
        json!({ "data": rows })
    } else {
        Value::Array(rows)
    };

    let fail = |e: &dyn std::fmt::Display| QuantdleError::Other(format!("fixture archive: {e}"));
    let body = serde_json::to_vec(&doc).map_err(|e| fail(&e))?;
    let mut w = ZipWriter::new(Cursor::new(Vec::new()));
    w.start_file(
        format!("{}_{}.json", fixture.symbol, start.format("%Y%m%d")),
        SimpleFileOptions::default(),
    )
    .map_err(|e| fail(&e))?;
    w.write_all(&body).map_err(|e| fail(&e))?;
    w.start_file("README.txt", SimpleFileOptions::default())
        .map_err(|e| fail(&e))?;
    w.write_all(b"fixture archive").map_err(|e| fail(&e))?;
    Ok(w.finish().map_err(|e| fail(&e))?.into_inner())
}

fn bar(base: f64, day: NaiveDate, i: u32) -> Value {
    let wobble = f64::from(i % 20) - 10.0;
    let open = base * wobble.mul_add(0.001, 1.0);
    let close = base * wobble.mul_add(0.001, 1.0005);
    json!({
        "date": day.format("%Y-%m-%d").to_string(),
        "time": "00:00:00",
        "open": open,
        "high": open.max(close) * 1.001,
        "low": open.min(close) * 0.999,
        "close": close,
        "volume": 1_000 + i64::from(i % 50) * 10,
        "spread": 2 + (i % 3),
        "spreadmax": 5 + (i % 4),
        "spreadopen": 2,
    })
}
