use crate::diagnostics::Diagnostics;
use crate::record::{Candle, RawRecord, ResultTable};
use crate::{DuplicatePolicy, QuantdleError, Warning};

/// Build the final table from every record collected across all windows.
///
/// - Empty input records a single [`Warning::NoData`] and yields an empty
///   table (the column schema is fixed, so callers need no special case).
/// - Each record's `date` and `time` fields are combined into one timestamp.
/// - Rows are stably sorted ascending by timestamp. Duplicate timestamps are
///   kept adjacent in arrival order unless `duplicates` is
///   [`DuplicatePolicy::KeepFirst`], which keeps the first of each run.
///
/// # Errors
/// Returns `Data` if any record lacks a parseable timestamp. Missing or
/// non-numeric price and volume fields become nulls in their row.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "quantdle::core::assemble",
        skip(records, diag),
        fields(records = records.len(), duplicates = ?duplicates),
    )
)]
pub fn assemble(
    records: Vec<RawRecord>,
    duplicates: DuplicatePolicy,
    diag: &mut Diagnostics,
) -> Result<ResultTable, QuantdleError> {
    if records.is_empty() {
        diag.warn(Warning::NoData);
        return Ok(ResultTable::empty());
    }

    let mut candles = records
        .iter()
        .map(Candle::from_raw)
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|c| c.datetime);

    if duplicates == DuplicatePolicy::KeepFirst {
        candles.dedup_by_key(|c| c.datetime);
    }

    Ok(ResultTable::from_sorted(candles))
}
