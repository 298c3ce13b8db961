use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::QuantdleError;
use crate::timeseries::util::{parse_timestamp, read_f64, read_i32, read_i64};

/// Column names of the assembled table, in order.
pub const COLUMNS: [&str; 9] = [
    "datetime",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "spread",
    "spreadmax",
    "spreadopen",
];

/// One record as it appeared in an archive entry.
///
/// The payload is kept verbatim; interpretation happens only in the assembler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Field value by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One OHLCV bar of the assembled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar timestamp (naive, as published by the service).
    pub datetime: NaiveDateTime,
    /// Opening price, when present and numeric.
    pub open: Option<f64>,
    /// Highest price, when present and numeric.
    pub high: Option<f64>,
    /// Lowest price, when present and numeric.
    pub low: Option<f64>,
    /// Closing price, when present and numeric.
    pub close: Option<f64>,
    /// Traded volume, when present.
    pub volume: Option<i64>,
    /// Spread at close, when present.
    pub spread: Option<i32>,
    /// Maximum spread within the bar, when present.
    pub spreadmax: Option<i32>,
    /// Spread at open, when present.
    pub spreadopen: Option<i32>,
}

impl Candle {
    /// Interpret a raw record.
    ///
    /// The timestamp comes from the `date` and `time` fields joined by a single
    /// space. Numeric fields accept JSON numbers or numeric strings; anything
    /// else (missing, null, unparseable) becomes `None`.
    ///
    /// # Errors
    /// Returns `Data` when the timestamp is missing or does not parse.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, QuantdleError> {
        let fields = raw.fields();
        let date = text_field(fields, "date")?;
        let time = text_field(fields, "time")?;
        let datetime = parse_timestamp(date, time).ok_or_else(|| {
            QuantdleError::Data(format!("unparseable timestamp '{date} {time}'"))
        })?;

        Ok(Self {
            datetime,
            open: read_f64(fields, "open"),
            high: read_f64(fields, "high"),
            low: read_f64(fields, "low"),
            close: read_f64(fields, "close"),
            volume: read_i64(fields, "volume"),
            spread: read_i32(fields, "spread"),
            spreadmax: read_i32(fields, "spreadmax"),
            spreadopen: read_i32(fields, "spreadopen"),
        })
    }
}

fn text_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str, QuantdleError> {
    match fields.get(name) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(QuantdleError::Data(format!(
            "field '{name}' must be a string, got {other}"
        ))),
        None => Err(QuantdleError::Data(format!("record missing field '{name}'"))),
    }
}

/// The final table: candles ordered by ascending `datetime`.
///
/// Built by [`crate::assemble`] or [`ResultTable::from_candles`]; the ordering
/// invariant holds for every instance handed to callers. Serialization is
/// one-way so no table can be decoded out of order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultTable {
    candles: Vec<Candle>,
}

impl ResultTable {
    /// An empty table carrying the full column schema.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            candles: Vec::new(),
        }
    }

    /// Build a table from candles in any order; the sort is stable.
    #[must_use]
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.datetime);
        Self { candles }
    }

    /// Column names, in order.
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// True when no rows were assembled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Rows in timestamp order.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Iterate rows in timestamp order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// First and last timestamps, if any rows exist.
    #[must_use]
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.candles.first(), self.candles.last()) {
            (Some(a), Some(b)) => Some((a.datetime, b.datetime)),
            _ => None,
        }
    }

    /// Unwrap into the ordered rows.
    #[must_use]
    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }

    pub(crate) const fn from_sorted(candles: Vec<Candle>) -> Self {
        Self { candles }
    }
}

impl IntoIterator for ResultTable {
    type Item = Candle;
    type IntoIter = std::vec::IntoIter<Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
