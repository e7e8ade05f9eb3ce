//! Daily record representation.

use chrono::NaiveDate;

/// Column order of the headerless daily CSV files.
pub const DAILY_COLUMNS: [&str; 9] = [
    "date",
    "code",
    "open",
    "close",
    "low",
    "high",
    "volume",
    "money",
    "turnover_ratio",
];

/// One trading day for one symbol. Empty source fields load as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub code: String,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub volume: f64,
    pub money: f64,
    pub turnover_ratio: f64,
}

impl DailyRecord {
    /// Sort and identity key.
    pub fn key(&self) -> (&str, NaiveDate) {
        (self.code.as_str(), self.date)
    }
}
