use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::dataset::check_positive;
use crate::models::distribution::{Distribution, DistributionKind};
use crate::models::drilldown::{
    ActivityLevel, InvestorType, MarketSentiment, Pressure, PriceDetail, SegmentDetail,
    ShareEntry, TradeSizeDetail, Trend, VolumeDetail, VolumeMetrics, WalletDetail,
};
use crate::models::series::{Resolution, Series, SeriesKind, TimePoint, DAY_MS, HOUR_MS};
use crate::services::seeded_source::{Seed, SeededSource, StdSeededSource};
use crate::services::series_service::MIN_PRICE;

const HOURS_PER_DAY: i64 = 24;

/// Hours either side of the anchor in a price detail.
const PRICE_DETAIL_SPAN_HOURS: i64 = 24;
const HOURLY_PRICE_VOLATILITY: f64 = 0.008;
const TRADING_HOURS_BUMP: f64 = 1.0005;

const HOURLY_JITTER: (f64, f64) = (0.5, 1.5);

// Salts separating the seeds of unrelated drill-downs on the same timestamp.
const METRICS_SALT: u64 = 0x4d45_5452;
const PRICE_PATH_SALT: u64 = 0x5041_5448;
const SENTIMENT_SALT: u64 = 0x5345_4e54;

/// Synthesizes finer-resolution detail for one selected point or segment.
///
/// Nothing is stored: the same selection always regenerates the same detail.
pub struct DrillDownService<S = StdSeededSource> {
    source: S,
    /// Base symbol used to name trading pairs
    symbol: String,
}

impl DrillDownService {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_source(StdSeededSource, symbol)
    }
}

impl<S: SeededSource> DrillDownService<S> {
    pub fn with_source(source: S, symbol: impl Into<String>) -> Self {
        Self {
            source,
            symbol: symbol.into(),
        }
    }

    // ── Volume ──────────────────────────────────────────────────────

    /// Expand one volume bar into 24 hourly values plus trading metrics.
    ///
    /// The hourly shape (busy 09–17 UTC, quiet 01–07 UTC) is jittered per hour
    /// and then rescaled so the hours sum to the bar's value.
    pub fn expand_volume(&self, parent: &TimePoint) -> Result<VolumeDetail, CoreError> {
        check_positive("volume", parent.value)?;

        let day_start = parent.timestamp.div_euclid(DAY_MS) * DAY_MS;
        let base = Seed::from_timestamp(parent.timestamp);

        let shaped: Vec<f64> = (0..HOURS_PER_DAY)
            .map(|hour| {
                let jitter = self.source.range(
                    base.with_offset(hour as u64),
                    HOURLY_JITTER.0,
                    HOURLY_JITTER.1,
                );
                hour_factor(hour) * jitter
            })
            .collect();
        let scale = parent.value / shaped.iter().sum::<f64>();

        let points = shaped
            .iter()
            .zip(0..HOURS_PER_DAY)
            .map(|(raw, hour)| TimePoint::new(day_start + hour * HOUR_MS, raw * scale))
            .collect();
        let hourly = Series::new_unchecked(SeriesKind::Volume, Resolution::Hourly, points);

        debug!(timestamp = parent.timestamp, total = parent.value, "expanded volume bar");

        Ok(VolumeDetail {
            parent: *parent,
            hourly,
            metrics: self.volume_metrics(parent),
        })
    }

    /// `expand_volume` for the point of `series` at `timestamp`.
    pub fn expand_volume_at(&self, series: &Series, timestamp: i64) -> Result<VolumeDetail, CoreError> {
        let point = find_point(series, timestamp)?;
        self.expand_volume(point)
    }

    /// Trade statistics for one bar, all derived from a single timestamp seed.
    fn volume_metrics(&self, parent: &TimePoint) -> VolumeMetrics {
        let seed = Seed::from_timestamp(parent.timestamp).with_offset(METRICS_SALT);
        let u = self.source.unit(seed);
        let lerp = |min: f64, max: f64| min + u * (max - min);

        let volume = parent.value;
        let trade_count = (volume / lerp(200.0, 500.0)).floor().max(1.0);
        let avg_trade_size = volume / trade_count;
        let unique_wallets = (trade_count * lerp(0.4, 0.7)).floor();
        let new_wallets = (unique_wallets * lerp(0.05, 0.15)).floor();

        let top_pairs = normalize_shares(&[
            (self.pair("ETH"), 50.0 + lerp(-10.0, 10.0)),
            (self.pair("USDC"), 30.0 + lerp(-8.0, 8.0)),
            (self.pair("USDT"), 20.0 + lerp(-6.0, 6.0)),
        ]);

        VolumeMetrics {
            trade_count: trade_count as u64,
            avg_trade_size,
            largest_trade: avg_trade_size * lerp(5.0, 15.0),
            unique_wallets: unique_wallets as u64,
            new_wallets: new_wallets as u64,
            top_pairs,
        }
    }

    // ── Distribution segments ───────────────────────────────────────

    /// Sub-metrics for one donut segment.
    ///
    /// One unit factor is drawn from the label's character sum and the
    /// percentage; every metric is a fixed formula of that factor, so metrics
    /// move together and repeat exactly for the same segment.
    pub fn segment_detail(
        &self,
        label: &str,
        percentage: f64,
        kind: DistributionKind,
    ) -> Result<SegmentDetail, CoreError> {
        if label.trim().is_empty() {
            return Err(CoreError::InvalidParameter("segment label is empty".into()));
        }
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(CoreError::InvalidParameter(format!(
                "segment percentage must be within 0..=100, got {percentage}"
            )));
        }

        let f = self.source.unit(Seed::from_label(label, percentage));

        let detail = match kind {
            DistributionKind::TradeSize => SegmentDetail::TradeSize(TradeSizeDetail {
                transactions: (1000.0 + f * 4000.0).floor() as u64,
                avg_trade_value: round2(50.0 + f * 1000.0),
                change_from_last_week: round2(-15.0 + f * 30.0),
                top_traders: (5.0 + f * 45.0).floor() as u64,
                popular_pairings: normalize_shares(&[
                    (self.pair("ETH"), 40.0 + f * 50.0),
                    (self.pair("USDC"), 30.0 + f * 40.0),
                ]),
            }),
            DistributionKind::WalletConcentration => {
                let num_wallets = (10.0 + f * 2000.0).floor();
                let total_holdings = round2(percentage * 10_000_000.0);
                let activity_idx = ((f * 5.0) as usize).min(ActivityLevel::ORDERED.len() - 1);
                SegmentDetail::Wallet(WalletDetail {
                    num_wallets: num_wallets as u64,
                    total_holdings,
                    avg_holding: round2(total_holdings / num_wallets),
                    activity: ActivityLevel::ORDERED[activity_idx],
                    holding_period_days: (10.0 + f * 200.0).floor() as u64,
                    top_assets: normalize_shares(&[
                        ("Ethereum".to_string(), 20.0 + f * 60.0),
                        ("Stablecoins".to_string(), 10.0 + f * 40.0),
                        ("Other".to_string(), 15.0 + (1.0 - f) * 30.0),
                    ]),
                })
            }
        };

        debug!(label, percentage, %kind, "generated segment detail");
        Ok(detail)
    }

    /// `segment_detail` for the segment of `distribution` named `label`.
    pub fn segment_detail_in(
        &self,
        distribution: &Distribution,
        label: &str,
    ) -> Result<SegmentDetail, CoreError> {
        let Some(segment) = distribution.find(label) else {
            warn!(label, kind = %distribution.kind, "drill-down on unknown segment");
            return Err(CoreError::NotFound(format!(
                "segment {label:?} in {} distribution",
                distribution.kind
            )));
        };
        self.segment_detail(&segment.label, f64::from(segment.percentage), distribution.kind)
    }

    // ── Price ───────────────────────────────────────────────────────

    /// Hourly price path spanning 24 hours either side of a daily price.
    ///
    /// Each hourly step is seeded by the hour's own timestamp, so the walk
    /// runs forward from the anchor and is inverted backward from it.
    pub fn price_detail(&self, anchor: &TimePoint) -> Result<PriceDetail, CoreError> {
        check_positive("price", anchor.value)?;

        let span = PRICE_DETAIL_SPAN_HOURS;
        let mut before = Vec::with_capacity(span as usize);
        let mut price = anchor.value;
        for h in (-span + 1..=0).rev() {
            let timestamp = anchor.timestamp + h * HOUR_MS;
            price = (price / self.hourly_step(timestamp)).max(MIN_PRICE);
            before.push(TimePoint::new(timestamp - HOUR_MS, price));
        }
        before.reverse();

        let mut points = before;
        points.push(*anchor);
        let mut price = anchor.value;
        for h in 1..=span {
            let timestamp = anchor.timestamp + h * HOUR_MS;
            price = (price * self.hourly_step(timestamp)).max(MIN_PRICE);
            points.push(TimePoint::new(timestamp, price));
        }

        let first = points[0].value;
        let trend = if anchor.value > first {
            Trend::Bullish
        } else {
            Trend::Bearish
        };
        let change_pct = ((anchor.value / first - 1.0) * 100.0).abs();

        let sentiment_seed = Seed::from_timestamp(anchor.timestamp).with_offset(SENTIMENT_SALT);
        let sentiment = MarketSentiment {
            high_volatility: self.source.chance(sentiment_seed.with_offset(0), 0.5),
            pressure: if self.source.chance(sentiment_seed.with_offset(1), 0.5) {
                Pressure::Buying
            } else {
                Pressure::Selling
            },
            investor_type: if self.source.chance(sentiment_seed.with_offset(2), 0.5) {
                InvestorType::Institutional
            } else {
                InvestorType::Retail
            },
        };

        Ok(PriceDetail {
            anchor: *anchor,
            hourly: Series::new_unchecked(SeriesKind::Price, Resolution::Hourly, points),
            trend,
            change_pct,
            sentiment,
        })
    }

    /// `price_detail` for the point of `series` at `timestamp`.
    pub fn price_detail_at(&self, series: &Series, timestamp: i64) -> Result<PriceDetail, CoreError> {
        let point = find_point(series, timestamp)?;
        self.price_detail(point)
    }

    /// Multiplicative move into the hour starting at `timestamp`.
    fn hourly_step(&self, timestamp: i64) -> f64 {
        let seed = Seed::from_timestamp(timestamp).with_offset(PRICE_PATH_SALT);
        let change = (self.source.unit(seed) - 0.5) * HOURLY_PRICE_VOLATILITY;
        let bump = if (9..=17).contains(&hour_of_day(timestamp)) {
            TRADING_HOURS_BUMP
        } else {
            1.0
        };
        (1.0 + change) * bump
    }

    fn pair(&self, quote: &str) -> String {
        format!("{}-{quote}", self.symbol)
    }
}

fn find_point(series: &Series, timestamp: i64) -> Result<&TimePoint, CoreError> {
    series.find(timestamp).ok_or_else(|| {
        warn!(kind = %series.kind(), timestamp, "drill-down on unknown point");
        CoreError::NotFound(format!("{} point at timestamp {timestamp}", series.kind()))
    })
}

fn hour_of_day(timestamp: i64) -> i64 {
    timestamp.div_euclid(HOUR_MS).rem_euclid(HOURS_PER_DAY)
}

/// Relative activity of an hour of the day (UTC).
fn hour_factor(hour: i64) -> f64 {
    match hour {
        9..=17 => 1.5,
        1..=7 => 0.3,
        _ => 0.5,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turn positive weights into integer percentages summing to exactly 100.
///
/// Rounding drift is absorbed by the largest entry (earliest on ties).
pub(crate) fn normalize_shares(weights: &[(String, f64)]) -> Vec<ShareEntry> {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut rounded: Vec<i64> = weights
        .iter()
        .map(|(_, w)| (w * 100.0 / total).round() as i64)
        .collect();

    let drift = 100 - rounded.iter().sum::<i64>();
    let largest = weights
        .iter()
        .enumerate()
        .fold(0, |best, (i, (_, w))| if *w > weights[best].1 { i } else { best });
    if let Some(slot) = rounded.get_mut(largest) {
        *slot += drift;
    }

    weights
        .iter()
        .zip(rounded)
        .map(|((name, _), pct)| ShareEntry {
            name: name.clone(),
            percentage: pct.max(0) as u32,
        })
        .collect()
}
