use chrono::{DateTime, Datelike, Utc, Weekday};
use tracing::{debug, trace, warn};

use crate::errors::CoreError;
use crate::models::dataset::{check_horizon, check_positive};
use crate::models::series::{Resolution, Series, SeriesKind, TimePoint, DAY_MS};
use crate::services::seeded_source::{Seed, SeededSource, StdSeededSource};

/// Exclusive lower bound on every generated price.
pub const PRICE_FLOOR: f64 = 0.01;

/// Value a price is clamped to once it would reach `PRICE_FLOOR`.
pub const MIN_PRICE: f64 = PRICE_FLOOR * (1.0 + 1e-6);

/// Floor for every other generated quantity.
pub const VALUE_FLOOR: f64 = 1e-6;

/// Center of the price step draw; below 0.5 gives a slight upward bias.
const PRICE_DRIFT_CENTER: f64 = 0.48;
const WEEKEND_PRICE_PENALTY: f64 = 0.995;

/// Volume grows by this factor per unit of fractional price move.
const VOLUME_MOVE_SENSITIVITY: f64 = 10.0;
const VOLUME_JITTER: (f64, f64) = (0.5, 1.5);

const LIQUIDITY_STEP: f64 = 0.03;
const LIQUIDITY_DRIFT_CENTER: f64 = 0.45;
const LIQUIDITY_EVENT_PROBABILITY: f64 = 0.03;
const LIQUIDITY_EVENT_SCALE: f64 = 0.2;

const HOLDER_GROWTH: GrowthCurve = GrowthCurve {
    initial_rate: 0.05,
    steady_rate: 0.005,
    jitter: (0.5, 1.0),
    weekend_factor: 1.0,
};

const TRANSACTION_GROWTH: GrowthCurve = GrowthCurve {
    initial_rate: 0.03,
    steady_rate: 0.003,
    jitter: (0.75, 1.25),
    weekend_factor: 0.85,
};

// Draw slots within one day of one series.
const SLOT_STEP: u64 = 0;
const SLOT_EVENT: u64 = 1;
const SLOT_EVENT_SIZE: u64 = 2;

/// Growth rate decaying linearly from `initial_rate` to `steady_rate` over the horizon.
struct GrowthCurve {
    initial_rate: f64,
    steady_rate: f64,
    jitter: (f64, f64),
    /// Applied to the reported value on Saturdays and Sundays; the trend is unaffected
    weekend_factor: f64,
}

/// Inputs shared by every series of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Timestamp of the last point
    pub as_of: DateTime<Utc>,
    /// Mixed into every draw
    pub seed: u64,
    /// Maximum daily fractional price step
    pub volatility: f64,
    /// Starting price of the walk that drives a standalone volume series
    pub reference_price: f64,
}

impl GenerationParams {
    pub fn new(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            seed: 0,
            volatility: 0.03,
            reference_price: 0.75,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }
}

/// Generates the base daily histories.
///
/// Every draw is seeded from the day's timestamp, the run seed, the series
/// kind and a slot number, so regenerating with the same inputs reproduces
/// every value exactly.
pub struct SeriesService<S = StdSeededSource> {
    source: S,
}

impl SeriesService {
    pub fn new() -> Self {
        Self::with_source(StdSeededSource)
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SeededSource> SeriesService<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Generate one daily series of `kind` with `horizon_days + 1` points ending at `params.as_of`.
    ///
    /// A non-positive horizon yields an empty series. A horizon above
    /// `MAX_HORIZON_DAYS` or a non-positive or non-finite `start_value` fails
    /// with `InvalidParameter`. For
    /// `SeriesKind::Volume`, `start_value` is the base volume and the driving
    /// price walk starts at `params.reference_price`.
    pub fn generate(
        &self,
        kind: SeriesKind,
        horizon_days: i64,
        start_value: f64,
        params: &GenerationParams,
    ) -> Result<Series, CoreError> {
        if let Err(e) = check_positive("start_value", start_value) {
            warn!(%kind, start_value, "rejected series generation");
            return Err(e);
        }
        match kind {
            SeriesKind::Price => self.price(horizon_days, start_value, params),
            SeriesKind::Volume => {
                let price = self.price(horizon_days, params.reference_price, params)?;
                self.volume_from_price(&price, start_value, params)
            }
            SeriesKind::Liquidity => self.liquidity(horizon_days, start_value, params),
            SeriesKind::Holders => {
                self.growth(kind, &HOLDER_GROWTH, horizon_days, start_value, params)
            }
            SeriesKind::Transactions => {
                self.growth(kind, &TRANSACTION_GROWTH, horizon_days, start_value, params)
            }
        }
    }

    /// Random walk with a slight upward drift and a small weekend dip.
    pub fn price(
        &self,
        horizon_days: i64,
        start_price: f64,
        params: &GenerationParams,
    ) -> Result<Series, CoreError> {
        check_horizon(horizon_days)?;
        check_positive("start_price", start_price)?;
        if !params.volatility.is_finite() || params.volatility < 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "volatility must be a finite non-negative number, got {}",
                params.volatility
            )));
        }

        let kind = SeriesKind::Price;
        let mut price = start_price;
        let points = day_timestamps(horizon_days, params.as_of)
            .map(|(day, timestamp)| {
                if day > 0 {
                    let draw = self.draw(kind, params, timestamp, SLOT_STEP);
                    let change = (draw - PRICE_DRIFT_CENTER) * params.volatility;
                    price *= 1.0 + change;
                    if is_weekend(timestamp) {
                        price *= WEEKEND_PRICE_PENALTY;
                    }
                    price = clamp_floor(kind, price, MIN_PRICE);
                }
                TimePoint::new(timestamp, price)
            })
            .collect();

        Ok(self.finish(kind, points))
    }

    /// Volume that follows the day-over-day size of price moves.
    ///
    /// Always derived from an existing price series; the result shares its timestamps.
    pub fn volume_from_price(
        &self,
        price: &Series,
        base_volume: f64,
        params: &GenerationParams,
    ) -> Result<Series, CoreError> {
        check_positive("base_volume", base_volume)?;
        if price.kind() != SeriesKind::Price {
            return Err(CoreError::InvalidParameter(format!(
                "volume must be derived from a price series, got {}",
                price.kind()
            )));
        }

        let kind = SeriesKind::Volume;
        let mut previous: Option<f64> = None;
        let points = price
            .iter()
            .map(|point| {
                let prev = previous.unwrap_or(point.value);
                previous = Some(point.value);
                let move_pct = (point.value - prev).abs() / prev;
                let multiplier = 1.0 + move_pct * VOLUME_MOVE_SENSITIVITY;
                let jitter = self.draw_range(kind, params, point.timestamp, SLOT_STEP, VOLUME_JITTER);
                let volume = clamp_floor(kind, base_volume * multiplier * jitter, VALUE_FLOOR);
                TimePoint::new(point.timestamp, volume)
            })
            .collect();

        Ok(self.finish(kind, points))
    }

    /// Drifting walk with occasional step additions ("liquidity events").
    pub fn liquidity(
        &self,
        horizon_days: i64,
        base_liquidity: f64,
        params: &GenerationParams,
    ) -> Result<Series, CoreError> {
        check_horizon(horizon_days)?;
        check_positive("base_liquidity", base_liquidity)?;

        let kind = SeriesKind::Liquidity;
        let mut liquidity = base_liquidity;
        let points = day_timestamps(horizon_days, params.as_of)
            .map(|(day, timestamp)| {
                if day > 0 {
                    let draw = self.draw(kind, params, timestamp, SLOT_STEP);
                    liquidity *= 1.0 + (draw - LIQUIDITY_DRIFT_CENTER) * LIQUIDITY_STEP;
                    let event_seed = self.seed(kind, params, timestamp, SLOT_EVENT);
                    if self.source.chance(event_seed, LIQUIDITY_EVENT_PROBABILITY) {
                        let size = self.draw(kind, params, timestamp, SLOT_EVENT_SIZE);
                        liquidity += base_liquidity * LIQUIDITY_EVENT_SCALE * size;
                    }
                    liquidity = clamp_floor(kind, liquidity, VALUE_FLOOR);
                }
                TimePoint::new(timestamp, liquidity)
            })
            .collect();

        Ok(self.finish(kind, points))
    }

    /// Integer-valued growth curve whose rate tapers off over the horizon.
    fn growth(
        &self,
        kind: SeriesKind,
        curve: &GrowthCurve,
        horizon_days: i64,
        start_value: f64,
        params: &GenerationParams,
    ) -> Result<Series, CoreError> {
        check_horizon(horizon_days)?;
        let mut trend = start_value;
        let points = day_timestamps(horizon_days, params.as_of)
            .map(|(day, timestamp)| {
                if day > 0 {
                    let progress = day as f64 / horizon_days as f64;
                    let rate = curve.steady_rate
                        + (curve.initial_rate - curve.steady_rate) * (1.0 - progress);
                    let jitter = self.draw_range(kind, params, timestamp, SLOT_STEP, curve.jitter);
                    trend *= 1.0 + rate * jitter;
                }
                let mut reported = trend;
                if is_weekend(timestamp) {
                    reported *= curve.weekend_factor;
                }
                TimePoint::new(timestamp, clamp_floor(kind, reported.floor(), 1.0))
            })
            .collect();

        Ok(self.finish(kind, points))
    }

    fn seed(&self, kind: SeriesKind, params: &GenerationParams, timestamp: i64, slot: u64) -> Seed {
        Seed::from_timestamp(timestamp)
            .with_offset(params.seed)
            .with_offset(kind.salt())
            .with_offset(slot)
    }

    fn draw(&self, kind: SeriesKind, params: &GenerationParams, timestamp: i64, slot: u64) -> f64 {
        self.source.unit(self.seed(kind, params, timestamp, slot))
    }

    fn draw_range(
        &self,
        kind: SeriesKind,
        params: &GenerationParams,
        timestamp: i64,
        slot: u64,
        (min, max): (f64, f64),
    ) -> f64 {
        self.source
            .range(self.seed(kind, params, timestamp, slot), min, max)
    }

    fn finish(&self, kind: SeriesKind, points: Vec<TimePoint>) -> Series {
        debug!(%kind, points = points.len(), "generated series");
        Series::new_unchecked(kind, Resolution::Daily, points)
    }
}

/// `(day index, timestamp)` pairs, one per day, the last one at `as_of`.
fn day_timestamps(horizon_days: i64, as_of: DateTime<Utc>) -> impl Iterator<Item = (i64, i64)> {
    let end = as_of.timestamp_millis();
    let horizon = horizon_days.max(0);
    let days = if horizon_days > 0 { 0..=horizon } else { 1..=0 };
    days.map(move |day| (day, end - (horizon - day) * DAY_MS))
}

fn is_weekend(timestamp: i64) -> bool {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| matches!(dt.weekday(), Weekday::Sat | Weekday::Sun))
        .unwrap_or(false)
}

/// Replace non-finite or too-small values with the floor.
fn clamp_floor(kind: SeriesKind, value: f64, floor: f64) -> f64 {
    if value.is_finite() && value >= floor {
        value
    } else {
        trace!(%kind, value, floor, "clamped degenerate value");
        floor
    }
}
