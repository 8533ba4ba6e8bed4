pub mod series_book;

use serde::{Deserialize, Serialize};

// Re-export for convenient access (e.g. `use crate::market_data::SeriesBook`).
pub use series_book::SeriesBook;

/// One OHLC bar. `timestamp` is unix seconds; `time` is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(alias = "time")]
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PricePoint {
    /// `high >= max(open, close)` and `low <= min(open, close)`.
    pub fn is_consistent(&self) -> bool {
        self.high >= self.open.max(self.close) && self.low <= self.open.min(self.close)
    }
}

/// Chronological bars for one symbol, oldest first.
pub type PriceSeries = Vec<PricePoint>;

/// Closing prices of `series`, oldest first.
pub fn closes(series: &[PricePoint]) -> Vec<f64> {
    series.iter().map(|p| p.close).collect()
}
