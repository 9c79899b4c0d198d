#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
pub use stockgrid::domain::ohlcv::PriceBar;
use stockgrid::domain::error::StockgridError;
use stockgrid::domain::trading_window::TradingWindow;
use stockgrid::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        _window: &TradingWindow,
    ) -> Result<Vec<PriceBar>, StockgridError> {
        self.calls.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockgridError::Fetch {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(bars.clone()),
            _ => Err(StockgridError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }
}

/// 2021-02-26, a Friday.
pub fn sample_window() -> TradingWindow {
    TradingWindow::for_day(&Utc.with_ymd_and_hms(2021, 2, 26, 18, 0, 0).unwrap())
}

pub fn session_open_utc() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 2, 26, 14, 30, 0).unwrap()
}

/// `count` two-minute bars from `start`, alternating up and down candles.
pub fn generate_bars(start: DateTime<Utc>, count: usize, start_price: f64) -> Vec<PriceBar> {
    (0..count)
        .map(|i| {
            let base = start_price + i as f64 * 0.1;
            let close = if i % 2 == 0 { base + 0.5 } else { base - 0.5 };
            PriceBar {
                timestamp: start + TimeDelta::minutes(2 * i as i64),
                open: base,
                high: base + 1.0,
                low: base - 1.0,
                close,
                volume: 1_000 + i as u64,
            }
        })
        .collect()
}
