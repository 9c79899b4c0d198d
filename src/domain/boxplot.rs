//! Single-sample boxplot statistics and candle coloring.
//!
//! Each bar is drawn as a boxplot of its four OHLC prices. The statistics
//! follow the usual Tukey boxplot: quartiles by linear interpolation between
//! order statistics, whiskers reaching the most extreme sample within
//! `WHISKER_IQR` interquartile ranges of the box.

pub const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
}

impl BoxStats {
    /// `None` for an empty sample or one containing NaN.
    pub fn from_sample(sample: &[f64]) -> Option<Self> {
        if sample.is_empty() || sample.iter().any(|v| v.is_nan()) {
            return None;
        }
        let mut sorted = sample.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.50);
        let q3 = percentile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|v| *v >= low_fence)
            .map_or(q1, |v| v.min(q1));
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .map_or(q3, |v| v.max(q3));

        Some(Self {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    pub fn of(open: f64, close: f64) -> Self {
        if close > open {
            Trend::Bullish
        } else if close < open {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }

    pub fn colors(self) -> CandleColors {
        match self {
            Trend::Bullish => CandleColors {
                outline: [0x00, 0xFF, 0x00],
                fill: [0xAA, 0xFF, 0xAA],
            },
            Trend::Bearish => CandleColors {
                outline: [0xFF, 0x00, 0x00],
                fill: [0xFF, 0xAA, 0xAA],
            },
            Trend::Neutral => CandleColors {
                outline: [0xEE, 0xEE, 0xEE],
                fill: [0xAA, 0xAA, 0xAA],
            },
        }
    }
}

/// Outline is used for box edges, median, whiskers and caps; fill for the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleColors {
    pub outline: [u8; 3],
    pub fill: [u8; 3],
}

pub fn candle_colors(open: f64, close: f64) -> CandleColors {
    Trend::of(open, close).colors()
}
