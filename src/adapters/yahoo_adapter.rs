//! Yahoo Finance chart API data adapter.
//!
//! One blocking GET per symbol against `{base_url}/{SYMBOL}` with the window
//! passed as unix seconds. Nothing is retried.

use crate::domain::error::StockgridError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::trading_window::TradingWindow;
use crate::ports::data_port::{BAR_INTERVAL, DataPort};
use chrono::DateTime;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stockgrid";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Quote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: &str) -> Result<Self, StockgridError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/{}", self.base_url, symbol)
    }
}

impl DataPort for YahooAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        window: &TradingWindow,
    ) -> Result<Vec<PriceBar>, StockgridError> {
        let url = self.chart_url(symbol);
        let query = [
            ("interval", BAR_INTERVAL.to_string()),
            ("period1", window.open.timestamp().to_string()),
            ("period2", window.close.timestamp().to_string()),
            ("includePrePost", "false".to_string()),
        ];
        debug!("GET {} {:?}", url, query);

        let fetch_err = |e: reqwest::Error| StockgridError::Fetch {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        };
        let response = self.client.get(&url).query(&query).send().map_err(fetch_err)?;
        let status = response.status();
        let body = response.text().map_err(fetch_err)?;

        let parsed = parse_chart_response(symbol, &body, window);
        if status.is_success() {
            return parsed;
        }
        // Unknown symbols come back as 404 with a chart.error body.
        match parsed {
            Err(e @ StockgridError::Provider { .. }) => Err(e),
            _ => Err(StockgridError::Fetch {
                symbol: symbol.to_string(),
                reason: format!("HTTP {}", status),
            }),
        }
    }
}

/// Decodes a chart response body into bars inside `window`, oldest first.
///
/// Rows with any missing price are dropped; a missing volume reads as 0.
pub fn parse_chart_response(
    symbol: &str,
    body: &str,
    window: &TradingWindow,
) -> Result<Vec<PriceBar>, StockgridError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| StockgridError::Fetch {
            symbol: symbol.to_string(),
            reason: format!("invalid chart response: {}", e),
        })?;

    if let Some(error) = response.chart.error {
        return Err(StockgridError::Provider {
            symbol: symbol.to_string(),
            code: error.code,
            description: error.description,
        });
    }

    let no_data = || StockgridError::NoData {
        symbol: symbol.to_string(),
    };
    let data = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(no_data)?;
    let timestamps = data.timestamp.ok_or_else(no_data)?;
    let quote = data.indicators.quote.into_iter().next().ok_or_else(no_data)?;

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut dropped = 0usize;
    for (i, &secs) in timestamps.iter().enumerate() {
        let prices = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
        );
        let (Some(open), Some(high), Some(low), Some(close)) = prices else {
            dropped += 1;
            continue;
        };
        let Some(timestamp) = DateTime::from_timestamp(secs, 0) else {
            dropped += 1;
            continue;
        };
        if !window.contains(&timestamp) {
            continue;
        }
        bars.push(PriceBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }
    if dropped > 0 {
        debug!("{}: dropped {} incomplete rows", symbol, dropped);
    }

    if bars.is_empty() {
        return Err(no_data());
    }
    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}
