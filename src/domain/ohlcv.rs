//! Intraday price bar representation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// [open, high, low, close]
    pub fn ohlc(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }

    /// (open + high + low + close) / 4
    pub fn ohlc_average(&self) -> f64 {
        self.ohlc().iter().sum::<f64>() / 4.0
    }
}
