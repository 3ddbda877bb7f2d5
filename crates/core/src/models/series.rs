use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Milliseconds in one hour.
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// A single timestamped value (epoch millis → value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub timestamp: i64,
    pub value: f64,
}

impl TimePoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// The timestamp as a UTC datetime, if it is representable.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// What a series measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Price,
    Volume,
    Liquidity,
    Holders,
    Transactions,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 5] = [
        SeriesKind::Price,
        SeriesKind::Volume,
        SeriesKind::Liquidity,
        SeriesKind::Holders,
        SeriesKind::Transactions,
    ];

    /// Flow quantities (volume, transactions) are summed when bucketed.
    /// Level quantities (price, liquidity, holders) keep the last value.
    pub fn default_aggregation(&self) -> super::window::AggregationMode {
        use super::window::AggregationMode;
        match self {
            SeriesKind::Volume | SeriesKind::Transactions => AggregationMode::Sum,
            SeriesKind::Price | SeriesKind::Liquidity | SeriesKind::Holders => {
                AggregationMode::LastValue
            }
        }
    }

    /// Salt mixed into every generation seed so two kinds never share a draw.
    pub(crate) fn salt(&self) -> u64 {
        match self {
            SeriesKind::Price => 0x5052_4943,
            SeriesKind::Volume => 0x564f_4c55,
            SeriesKind::Liquidity => 0x4c49_5155,
            SeriesKind::Holders => 0x484f_4c44,
            SeriesKind::Transactions => 0x5452_414e,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Price => write!(f, "Price"),
            SeriesKind::Volume => write!(f, "Volume"),
            SeriesKind::Liquidity => write!(f, "Liquidity"),
            SeriesKind::Holders => write!(f, "Holders"),
            SeriesKind::Transactions => write!(f, "Transactions"),
        }
    }
}

/// Spacing between consecutive points of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Hourly,
    Daily,
    Weekly,
}

impl Resolution {
    /// How many points of this resolution cover one day.
    pub fn points_per_day(&self) -> f64 {
        match self {
            Resolution::Hourly => 24.0,
            Resolution::Daily => 1.0,
            Resolution::Weekly => 1.0 / 7.0,
        }
    }
}

/// An ordered, read-only sequence of points sharing one meaning.
///
/// Timestamps strictly increase. A series is never mutated after creation;
/// filtering and aggregation produce new series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    kind: SeriesKind,
    resolution: Resolution,
    points: Vec<TimePoint>,
}

impl Series {
    /// Build a series from caller-supplied points, rejecting unordered or
    /// duplicate timestamps.
    pub fn from_points(
        kind: SeriesKind,
        resolution: Resolution,
        points: Vec<TimePoint>,
    ) -> Result<Self, CoreError> {
        if let Some(pair) = points.windows(2).find(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(CoreError::InvalidParameter(format!(
                "{kind} series timestamps must strictly increase ({} then {})",
                pair[0].timestamp, pair[1].timestamp
            )));
        }
        Ok(Self::new_unchecked(kind, resolution, points))
    }

    /// Internal constructor for series whose ordering is guaranteed by construction.
    pub(crate) fn new_unchecked(
        kind: SeriesKind,
        resolution: Resolution,
        points: Vec<TimePoint>,
    ) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self {
            kind,
            resolution,
            points,
        }
    }

    pub fn empty(kind: SeriesKind, resolution: Resolution) -> Self {
        Self::new_unchecked(kind, resolution, Vec::new())
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TimePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimePoint> {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Find the point at an exact timestamp. Uses binary search (O(log n)).
    pub fn find(&self, timestamp: i64) -> Option<&TimePoint> {
        self.points
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
            .map(|idx| &self.points[idx])
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a TimePoint;
    type IntoIter = std::slice::Iter<'a, TimePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
