use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Display window selectable on the price and volume charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    /// "24H"
    Day,
    /// "7D"
    Week,
    /// "30D"
    Month,
    /// "90D"
    Quarter,
    /// "ALL"
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Quarter,
        TimeWindow::All,
    ];

    /// Number of trailing days retained, or `None` for the whole history.
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeWindow::Day => Some(1),
            TimeWindow::Week => Some(7),
            TimeWindow::Month => Some(30),
            TimeWindow::Quarter => Some(90),
            TimeWindow::All => None,
        }
    }

    /// Coarse windows are re-bucketed into calendar weeks.
    pub fn is_coarse(&self) -> bool {
        matches!(self, TimeWindow::Quarter | TimeWindow::All)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Day => "24H",
            TimeWindow::Week => "7D",
            TimeWindow::Month => "30D",
            TimeWindow::Quarter => "90D",
            TimeWindow::All => "ALL",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeWindow::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidParameter(format!("unknown window label: {s:?}")))
    }
}

/// How points falling into one bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMode {
    /// Add values together (volume-like flows).
    Sum,
    /// Keep the chronologically last value (price-like levels).
    LastValue,
}
