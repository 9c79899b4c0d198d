//! Regular trading session boundaries for the current day.
//!
//! The session is computed in a fixed -05:00 offset. There is no daylight
//! saving, holiday or weekend awareness: a Saturday window is still
//! 09:30-16:00.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use std::fmt;

/// Offset of the exchange clock, seconds west of UTC.
pub const MARKET_OFFSET_WEST_SECS: i32 = 5 * 3600;

/// Session open, minutes after local midnight (09:30).
pub const OPEN_MINUTES: i64 = 9 * 60 + 30;

/// Session close, minutes after local midnight (16:00).
pub const CLOSE_MINUTES: i64 = 16 * 60;

pub fn market_offset() -> FixedOffset {
    FixedOffset::west_opt(MARKET_OFFSET_WEST_SECS).expect("-05:00 is a valid offset")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingWindow {
    pub open: DateTime<FixedOffset>,
    pub close: DateTime<FixedOffset>,
}

impl TradingWindow {
    /// Window for the calendar day `now` falls on in the market offset.
    pub fn for_day<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let offset = market_offset();
        let date = now.with_timezone(&offset).date_naive();
        Self {
            open: at_local_minutes(date, OPEN_MINUTES, offset),
            close: at_local_minutes(date, CLOSE_MINUTES, offset),
        }
    }

    pub fn today() -> Self {
        Self::for_day(&Utc::now())
    }

    pub fn date(&self) -> NaiveDate {
        self.open.date_naive()
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        *ts >= self.open.with_timezone(&Utc) && *ts <= self.close.with_timezone(&Utc)
    }
}

impl fmt::Display for TradingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.open.to_rfc3339(), self.close.to_rfc3339())
    }
}

fn at_local_minutes(date: NaiveDate, minutes: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = NaiveDateTime::from(date) + TimeDelta::minutes(minutes);
    let utc = local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}
