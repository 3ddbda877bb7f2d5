use tracing::warn;

use crate::errors::CoreError;
use crate::models::dataset::{SeriesSet, TokenProfile};
use crate::models::series::{Series, TimePoint};
use crate::models::summary::{
    CommunityStats, ExtremePoint, MarketSnapshot, PairMarket, SummaryStats, SupplyMetrics,
};

/// Pair name, share of liquidity, share of volume.
const PAIR_SPLIT: [(&str, f64, f64); 2] = [("ETH", 0.75, 0.65), ("USDC", 0.25, 0.35)];

/// Social audience estimated as a fraction of holders.
const TWITTER_PER_HOLDER: f64 = 0.8;
const DISCORD_PER_HOLDER: f64 = 0.6;
const TELEGRAM_PER_HOLDER: f64 = 0.4;

/// Computes summary figures from generated series.
pub struct StatsService;

impl StatsService {
    pub fn new() -> Self {
        Self
    }

    /// Current value, 24h/7d change and all-time extremes of a series.
    ///
    /// Change offsets are counted in points from the end using the series
    /// resolution. When the series is too short the first point is the baseline.
    pub fn summarize(&self, series: &Series) -> Result<SummaryStats, CoreError> {
        let points = series.points();
        let Some(last) = points.last() else {
            warn!(kind = %series.kind(), "cannot summarize an empty series");
            return Err(CoreError::InvalidParameter(format!(
                "cannot summarize an empty {} series",
                series.kind()
            )));
        };

        let per_day = series.resolution().points_per_day();
        let change_24h = percent_change(baseline(points, offset(1.0, per_day)).value, last.value);
        let change_7d = percent_change(baseline(points, offset(7.0, per_day)).value, last.value);

        // Strict comparisons keep the earliest point on ties.
        let mut high = *last;
        let mut low = *last;
        for point in points {
            if point.value > high.value || (point.value == high.value && point.timestamp < high.timestamp) {
                high = *point;
            }
            if point.value < low.value || (point.value == low.value && point.timestamp < low.timestamp) {
                low = *point;
            }
        }

        Ok(SummaryStats {
            current: last.value,
            change_24h,
            change_7d,
            all_time_high: extreme(&high),
            all_time_low: extreme(&low),
        })
    }

    /// Header and stats-panel figures from the latest points of a dataset.
    pub fn market_snapshot(
        &self,
        series: &SeriesSet,
        token: &TokenProfile,
    ) -> Result<MarketSnapshot, CoreError> {
        let price = self.summarize(&series.price)?;
        let volume = self.summarize(&series.volume)?;
        let liquidity = self.summarize(&series.liquidity)?;
        let holders = self.summarize(&series.holders)?.current as u64;
        let transactions_24h = self.summarize(&series.transactions)?.current as u64;

        let pairs = PAIR_SPLIT
            .iter()
            .map(|(quote, liquidity_share, volume_share)| PairMarket {
                pair: format!("{}-{quote}", token.symbol),
                liquidity: liquidity.current * liquidity_share,
                volume_24h: volume.current * volume_share,
            })
            .collect();

        let audience = |ratio: f64| (holders as f64 * ratio).floor() as u64;

        Ok(MarketSnapshot {
            volume_24h: volume.current,
            volume_change_24h: volume.change_24h,
            total_liquidity: liquidity.current,
            liquidity_change_24h: liquidity.change_24h,
            pairs,
            community: CommunityStats {
                holders,
                transactions_24h,
                twitter_followers: audience(TWITTER_PER_HOLDER),
                discord_members: audience(DISCORD_PER_HOLDER),
                telegram_members: audience(TELEGRAM_PER_HOLDER),
            },
            supply: SupplyMetrics {
                market_cap: price.current * token.circulating_supply as f64,
                fully_diluted_valuation: price.current * token.max_supply as f64,
                circulating_supply: token.circulating_supply,
                total_supply: token.total_supply,
                max_supply: token.max_supply,
            },
        })
    }
}

impl Default for StatsService {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of points spanning `days`, at least one.
fn offset(days: f64, points_per_day: f64) -> usize {
    ((days * points_per_day).round() as usize).max(1)
}

/// The point `offset` positions before the last one, or the first point.
fn baseline(points: &[TimePoint], offset: usize) -> &TimePoint {
    let idx = (points.len() - 1).saturating_sub(offset);
    &points[idx]
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

fn extreme(point: &TimePoint) -> ExtremePoint {
    ExtremePoint {
        value: point.value,
        timestamp: point.timestamp,
    }
}
