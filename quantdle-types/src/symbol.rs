use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Availability window of one symbol as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Symbol code (e.g. "EURUSD").
    pub symbol: String,
    /// First day with data.
    pub available_from: NaiveDate,
    /// Last day with data.
    pub available_to: NaiveDate,
}
