//! CSV file data adapter.
//!
//! Reads `<base_path>/<SYMBOL>.csv` with the header
//! `timestamp,open,high,low,close,volume` and RFC 3339 timestamps.

use crate::domain::error::StockgridError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::trading_window::TradingWindow;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        window: &TradingWindow,
    ) -> Result<Vec<PriceBar>, StockgridError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| StockgridError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.deserialize() {
            let row: CsvRow = result.map_err(|e| StockgridError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
                .map_err(|e| StockgridError::Fetch {
                    symbol: symbol.to_string(),
                    reason: format!("invalid timestamp {:?}: {}", row.timestamp, e),
                })?
                .with_timezone(&Utc);

            if !window.contains(&timestamp) {
                continue;
            }
            if [row.open, row.high, row.low, row.close]
                .iter()
                .any(|p| !p.is_finite())
            {
                return Err(StockgridError::Fetch {
                    symbol: symbol.to_string(),
                    reason: format!("non-finite price at {}", row.timestamp),
                });
            }

            bars.push(PriceBar {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        if bars.is_empty() {
            return Err(StockgridError::NoData {
                symbol: symbol.to_string(),
            });
        }
        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn window() -> TradingWindow {
        TradingWindow::for_day(&Utc.with_ymd_and_hms(2021, 2, 26, 18, 0, 0).unwrap())
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "timestamp,open,high,low,close,volume\n\
            2021-02-26T10:02:00-05:00,102.0,104.0,101.0,103.0,900\n\
            2021-02-26T10:00:00-05:00,100.0,110.0,90.0,105.0,50000\n\
            2021-02-26T08:00:00-05:00,99.0,99.5,98.0,99.0,10\n";
        fs::write(path.join("GME.csv"), csv_content).unwrap();
        fs::write(
            path.join("AMC.csv"),
            "timestamp,open,high,low,close,volume\n",
        )
        .unwrap();
        fs::write(
            path.join("BAD.csv"),
            "timestamp,open,high,low,close,volume\nyesterday,1,1,1,1,1\n",
        )
        .unwrap();

        fs::write(
            path.join("NAN.csv"),
            "timestamp,open,high,low,close,volume\n\
             2021-02-26T10:00:00-05:00,10.0,11.0,9.0,10.5,100\n\
             2021-02-26T10:02:00-05:00,NaN,11.0,9.0,10.5,100\n\
             2021-02-26T10:04:00-05:00,10.0,inf,9.0,10.5,100\n",
        )
        .unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_bars_sorted_within_window() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_bars("GME", &window()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2021, 2, 26, 15, 0, 0).unwrap()
        );
        assert_eq!(bars[0].ohlc(), [100.0, 110.0, 90.0, 105.0]);
        assert_eq!(bars[0].volume, 50000);
        assert_eq!(bars[1].close, 103.0);
    }

    #[test]
    fn empty_file_is_no_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_bars("AMC", &window()).unwrap_err();
        assert!(matches!(err, StockgridError::NoData { .. }));
    }

    #[test]
    fn missing_file_is_fetch_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_bars("XYZ", &window()).unwrap_err();
        assert!(matches!(err, StockgridError::Fetch { ref symbol, .. } if symbol == "XYZ"));
    }

    #[test]
    fn bad_timestamp_is_fetch_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        assert!(adapter.fetch_bars("BAD", &window()).is_err());
    }

    #[test]
    fn non_finite_price_is_fetch_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);
        let err = adapter.fetch_bars("NAN", &window()).unwrap_err();
        assert!(matches!(err, StockgridError::Fetch { ref reason, .. } if reason.contains("non-finite")));
    }
}
