pub mod errors;
pub mod models;
pub mod services;

use chrono::{DateTime, Utc};
use models::{
    dataset::{Dataset, DatasetConfig, SeriesSet},
    distribution::{DistributionKind, Distributions},
    drilldown::{PriceDetail, SegmentDetail, VolumeDetail},
    series::{Series, SeriesKind, TimePoint},
    settings::{Settings, Theme},
    window::TimeWindow,
};
use services::{
    drilldown_service::DrillDownService,
    series_service::{GenerationParams, SeriesService},
    stats_service::StatsService,
    window_service::WindowService,
};
use tracing::{debug, info};

use errors::CoreError;

/// Holders on the first day of every generated history.
const INITIAL_HOLDERS: f64 = 500.0;

/// Daily transactions on the first day of every generated history.
const INITIAL_TRANSACTIONS: f64 = 80.0;

/// Build the full in-memory dataset in one shot.
///
/// Pure given `config` once `as_of` is fixed: the same config always yields
/// the same dataset.
pub fn generate_dataset(config: &DatasetConfig) -> Result<Dataset, CoreError> {
    config.validate()?;

    let as_of = config.as_of.unwrap_or_else(Utc::now);
    let params = GenerationParams::new(as_of)
        .with_seed(config.seed)
        .with_volatility(config.price_volatility);

    let series_service = SeriesService::new();
    let horizon = config.horizon_days;
    let price = series_service.price(horizon, config.start_price, &params)?;
    let volume = series_service.volume_from_price(&price, config.base_volume, &params)?;
    let series = SeriesSet {
        volume,
        liquidity: series_service.liquidity(horizon, config.base_liquidity, &params)?,
        holders: series_service.generate(SeriesKind::Holders, horizon, INITIAL_HOLDERS, &params)?,
        transactions: series_service.generate(
            SeriesKind::Transactions,
            horizon,
            INITIAL_TRANSACTIONS,
            &params,
        )?,
        price,
    };

    let stats_service = StatsService::new();
    let summary = stats_service.summarize(&series.price)?;
    let market = stats_service.market_snapshot(&series, &config.token)?;

    info!(
        symbol = %config.token.symbol,
        horizon_days = horizon,
        seed = config.seed,
        current_price = summary.current,
        "generated dataset"
    );

    Ok(Dataset {
        token: config.token.clone(),
        as_of,
        series,
        summary,
        market,
        distributions: Distributions::default(),
    })
}

/// Main entry point for a dashboard session.
/// Holds the generated dataset, the display settings and the services that
/// derive views and drill-downs from them.
#[must_use]
pub struct TokenDashboard {
    config: DatasetConfig,
    dataset: Dataset,
    settings: Settings,
    window_service: WindowService,
    drilldown_service: DrillDownService,
}

impl std::fmt::Debug for TokenDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDashboard")
            .field("symbol", &self.dataset.token.symbol)
            .field("as_of", &self.dataset.as_of)
            .field("points", &self.dataset.series.price.len())
            .field("theme", &self.settings.theme)
            .finish()
    }
}

impl TokenDashboard {
    /// Generate a dataset from `config` and open a session on it with default settings.
    pub fn new(config: DatasetConfig) -> Result<Self, CoreError> {
        Self::with_settings(config, Settings::default())
    }

    pub fn with_settings(config: DatasetConfig, settings: Settings) -> Result<Self, CoreError> {
        let dataset = generate_dataset(&config)?;
        let drilldown_service = DrillDownService::new(config.token.symbol.clone());
        Ok(Self {
            config,
            dataset,
            settings,
            window_service: WindowService::new(),
            drilldown_service,
        })
    }

    /// Replace the dataset with one generated from a new config.
    /// The current dataset is kept if the new config is rejected.
    pub fn regenerate(&mut self, config: DatasetConfig) -> Result<(), CoreError> {
        let dataset = generate_dataset(&config)?;
        self.drilldown_service = DrillDownService::new(config.token.symbol.clone());
        self.config = config;
        self.dataset = dataset;
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn series(&self, kind: SeriesKind) -> &Series {
        self.dataset.series.get(kind)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch between dark and light. The settings value is replaced, not edited.
    pub fn toggle_theme(&mut self) -> Theme {
        self.settings = self.settings.toggled();
        debug!(theme = %self.settings.theme, "theme toggled");
        self.settings.theme
    }

    // ── Windows ─────────────────────────────────────────────────────

    /// Filter a series of the dataset to a display window ("24H", "7D", "30D",
    /// "90D", "ALL") relative to the wall clock, bucketing coarse windows by week.
    pub fn filter_and_aggregate(&self, kind: SeriesKind, window_label: &str) -> Result<Series, CoreError> {
        self.filter_and_aggregate_at(kind, window_label, Utc::now())
    }

    /// `filter_and_aggregate` relative to an explicit "now".
    pub fn filter_and_aggregate_at(
        &self,
        kind: SeriesKind,
        window_label: &str,
        now: DateTime<Utc>,
    ) -> Result<Series, CoreError> {
        self.window_service
            .windowed_by_label(self.series(kind), window_label, now)
    }

    /// The same window over the dataset's own end timestamp.
    pub fn window_as_of_dataset(&self, kind: SeriesKind, window: TimeWindow) -> Series {
        self.window_service.windowed(
            self.series(kind),
            window,
            kind.default_aggregation(),
            self.dataset.as_of,
        )
    }

    // ── Drill-downs ─────────────────────────────────────────────────

    /// Expand any volume point (daily or weekly bar) into hourly detail.
    pub fn drill_down_volume_point(&self, point: &TimePoint) -> Result<VolumeDetail, CoreError> {
        self.drilldown_service.expand_volume(point)
    }

    /// Expand the daily volume point at `timestamp`. Fails with `NotFound` if absent.
    pub fn drill_down_volume(&self, timestamp: i64) -> Result<VolumeDetail, CoreError> {
        self.drilldown_service
            .expand_volume_at(&self.dataset.series.volume, timestamp)
    }

    /// Segment detail from a raw label and percentage.
    pub fn drill_down_segment(
        &self,
        label: &str,
        percentage: f64,
        is_trade_size: bool,
    ) -> Result<SegmentDetail, CoreError> {
        let kind = if is_trade_size {
            DistributionKind::TradeSize
        } else {
            DistributionKind::WalletConcentration
        };
        self.drilldown_service.segment_detail(label, percentage, kind)
    }

    /// Segment detail for a segment of the dataset's distributions. Fails with `NotFound` if absent.
    pub fn drill_down_distribution(
        &self,
        kind: DistributionKind,
        label: &str,
    ) -> Result<SegmentDetail, CoreError> {
        self.drilldown_service
            .segment_detail_in(self.dataset.distributions.get(kind), label)
    }

    /// Hourly price detail around the daily price at `timestamp`. Fails with `NotFound` if absent.
    pub fn price_detail(&self, timestamp: i64) -> Result<PriceDetail, CoreError> {
        self.drilldown_service
            .price_detail_at(&self.dataset.series.price, timestamp)
    }
}
