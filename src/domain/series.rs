//! Per-symbol series: the bars of one symbol split into parallel arrays.

use crate::domain::ohlcv::PriceBar;
use chrono::{DateTime, Utc};

/// Element `i` of every array describes bar `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<u64>,
    pub ohlc: Vec<[f64; 4]>,
    pub ohlc_averages: Vec<f64>,
}

impl SymbolSeries {
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let mut series = Self {
            timestamps: Vec::with_capacity(bars.len()),
            opens: Vec::with_capacity(bars.len()),
            highs: Vec::with_capacity(bars.len()),
            lows: Vec::with_capacity(bars.len()),
            closes: Vec::with_capacity(bars.len()),
            volumes: Vec::with_capacity(bars.len()),
            ohlc: Vec::with_capacity(bars.len()),
            ohlc_averages: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            series.timestamps.push(bar.timestamp);
            series.opens.push(bar.open);
            series.highs.push(bar.high);
            series.lows.push(bar.low);
            series.closes.push(bar.close);
            series.volumes.push(bar.volume);
            series.ohlc.push(bar.ohlc());
            series.ohlc_averages.push(bar.ohlc_average());
        }
        series
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Lowest low and highest high, `None` for an empty series.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let min = self.lows.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}
