use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::series::{Resolution, Series, TimePoint, DAY_MS};
use crate::models::window::{AggregationMode, TimeWindow};

/// Filters series to a display window and re-buckets coarse windows by week.
pub struct WindowService;

impl WindowService {
    pub fn new() -> Self {
        Self
    }

    /// Keep the points of `series` inside `window` (relative to `now`) and,
    /// for coarse windows, combine them into weekly buckets using `mode`.
    pub fn windowed(
        &self,
        series: &Series,
        window: TimeWindow,
        mode: AggregationMode,
        now: DateTime<Utc>,
    ) -> Series {
        let filtered = self.filter(series, window, now);
        if !window.is_coarse() {
            return filtered;
        }
        let aggregated = self.aggregate_weekly(&filtered, mode);
        debug!(
            kind = %series.kind(),
            %window,
            points = filtered.len(),
            buckets = aggregated.len(),
            "aggregated series by week"
        );
        aggregated
    }

    /// `windowed` driven by a display label, using the series kind's natural aggregation.
    pub fn windowed_by_label(
        &self,
        series: &Series,
        label: &str,
        now: DateTime<Utc>,
    ) -> Result<Series, CoreError> {
        let window: TimeWindow = label.parse()?;
        Ok(self.windowed(series, window, series.kind().default_aggregation(), now))
    }

    /// Points with `timestamp >= now - window.days`. The "all" window keeps everything.
    pub fn filter(&self, series: &Series, window: TimeWindow, now: DateTime<Utc>) -> Series {
        let Some(days) = window.days() else {
            return series.clone();
        };
        let cutoff = now.timestamp_millis() - days * DAY_MS;
        let points = series
            .iter()
            .filter(|p| p.timestamp >= cutoff)
            .copied()
            .collect();
        Series::new_unchecked(series.kind(), series.resolution(), points)
    }

    /// Group points by the calendar week containing them.
    ///
    /// Buckets are keyed by the week start and emitted in key order.
    pub fn aggregate_weekly(&self, series: &Series, mode: AggregationMode) -> Series {
        let mut buckets: BTreeMap<i64, f64> = BTreeMap::new();
        for point in series {
            let key = week_start(point.timestamp);
            match mode {
                AggregationMode::Sum => *buckets.entry(key).or_insert(0.0) += point.value,
                // Points are ascending, so the last write is the latest value.
                AggregationMode::LastValue => {
                    buckets.insert(key, point.value);
                }
            }
        }
        let points = buckets
            .into_iter()
            .map(|(timestamp, value)| TimePoint::new(timestamp, value))
            .collect();
        Series::new_unchecked(series.kind(), Resolution::Weekly, points)
    }
}

impl Default for WindowService {
    fn default() -> Self {
        Self::new()
    }
}

/// Midnight UTC of the Sunday on or before `timestamp`.
pub fn week_start(timestamp: i64) -> i64 {
    let day_start = timestamp.div_euclid(DAY_MS) * DAY_MS;
    let Some(date) = DateTime::from_timestamp_millis(day_start) else {
        return day_start;
    };
    let back = i64::from(date.weekday().num_days_from_sunday());
    day_start - back * DAY_MS
}
