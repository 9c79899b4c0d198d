//! X-axis tick marks at whole hours.

use chrono::{DateTime, Timelike, Utc};

/// Hours subtracted from the bar hour when labeling a tick.
///
/// Bars are stored in UTC, so this yields the -05:00 wall clock hour. It is
/// applied unconditionally, including the unusual case of a timestamp
/// already expressed in -05:00 being converted to UTC first.
pub const LABEL_HOUR_SHIFT: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickMark {
    /// Bar index the tick sits on.
    pub position: usize,
    pub label: String,
}

/// One tick per bar whose timestamp falls on minute 0. Seconds are ignored.
pub fn hour_ticks(timestamps: &[DateTime<Utc>]) -> Vec<TickMark> {
    timestamps
        .iter()
        .enumerate()
        .filter(|(_, ts)| ts.minute() == 0)
        .map(|(position, ts)| TickMark {
            position,
            label: hour_label(ts),
        })
        .collect()
}

pub fn hour_label(ts: &DateTime<Utc>) -> String {
    format!(
        "{}:{:02}",
        i64::from(ts.hour()) - LABEL_HOUR_SHIFT,
        ts.minute()
    )
}
