use polars::prelude::*;

use crate::QuantdleError;
use crate::record::ResultTable;

/// Conversion of a value into a polars `DataFrame`.
pub trait ToDataFrame {
    /// Build the dataframe.
    ///
    /// # Errors
    /// Returns `Data` if polars rejects the columns.
    fn to_dataframe(&self) -> Result<DataFrame, QuantdleError>;
}

impl ToDataFrame for ResultTable {
    fn to_dataframe(&self) -> Result<DataFrame, QuantdleError> {
        let err = |what: &str, e: PolarsError| QuantdleError::Data(format!("{what}: {e}"));

        let datetimes: Vec<i64> = self
            .iter()
            .map(|c| c.datetime.and_utc().timestamp_millis())
            .collect();
        let opens: Vec<Option<f64>> = self.iter().map(|c| c.open).collect();
        let highs: Vec<Option<f64>> = self.iter().map(|c| c.high).collect();
        let lows: Vec<Option<f64>> = self.iter().map(|c| c.low).collect();
        let closes: Vec<Option<f64>> = self.iter().map(|c| c.close).collect();
        let volumes: Vec<Option<i64>> = self.iter().map(|c| c.volume).collect();
        let spreads: Vec<Option<i32>> = self.iter().map(|c| c.spread).collect();
        let spreadmaxes: Vec<Option<i32>> = self.iter().map(|c| c.spreadmax).collect();
        let spreadopens: Vec<Option<i32>> = self.iter().map(|c| c.spreadopen).collect();

        DataFrame::new(vec![
            Column::new("datetime".into(), datetimes)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
                .map_err(|e| err("datetime cast", e))?,
            Column::new("open".into(), opens),
            Column::new("high".into(), highs),
            Column::new("low".into(), lows),
            Column::new("close".into(), closes),
            Column::new("volume".into(), volumes),
            Column::new("spread".into(), spreads),
            Column::new("spreadmax".into(), spreadmaxes),
            Column::new("spreadopen".into(), spreadopens),
        ])
        .map_err(|e| err("dataframe creation", e))
    }
}
