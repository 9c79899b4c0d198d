//! Market data access port.

use crate::domain::error::StockgridError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::trading_window::TradingWindow;

/// Bar granularity requested from every data source.
pub const BAR_INTERVAL: &str = "2m";

pub trait DataPort {
    /// Bars of `symbol` within `window`, oldest first.
    ///
    /// An empty result is an error (`NoData`), not an empty vector.
    fn fetch_bars(
        &self,
        symbol: &str,
        window: &TradingWindow,
    ) -> Result<Vec<PriceBar>, StockgridError>;
}
