use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::distribution::Distributions;
use super::series::{Series, SeriesKind};
use super::summary::{MarketSnapshot, SummaryStats};
use crate::errors::CoreError;

/// Longest generated history in days (10 years).
pub const MAX_HORIZON_DAYS: i64 = 3650;

/// Static description of the token the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenProfile {
    pub name: String,
    pub symbol: String,
    pub contract_address: String,
    pub decimals: u8,
    pub description: String,
    pub website: String,
    pub circulating_supply: u64,
    pub total_supply: u64,
    pub max_supply: u64,
}

impl Default for TokenProfile {
    fn default() -> Self {
        Self {
            name: "NebulaCoin".to_string(),
            symbol: "NBC".to_string(),
            contract_address: "0x7e57f3F336156196ed873F3A7A11E948BcaB73C5".to_string(),
            decimals: 18,
            description: "NebulaCoin (NBC) is a decentralized digital asset focused on \
                          interstellar commerce solutions and space-themed NFT ecosystems."
                .to_string(),
            website: "https://nebulacoin.io".to_string(),
            circulating_supply: 1_000_000_000,
            total_supply: 5_000_000_000,
            max_supply: 10_000_000_000,
        }
    }
}

/// Parameters for one full dataset generation.
///
/// Loaded once at session start (or replaced wholesale when parameters change).
/// Identical configs with the same `as_of` always produce identical datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Days of history; each daily series has `horizon_days + 1` points
    pub horizon_days: i64,

    /// Price of the first point
    pub start_price: f64,

    /// Maximum daily fractional price step
    pub price_volatility: f64,

    /// Volume of a day with no price movement, before jitter
    pub base_volume: f64,

    /// Liquidity at the start of the history
    pub base_liquidity: f64,

    /// Dataset-wide seed mixed into every generation draw
    pub seed: u64,

    /// "Now" for the generated history; `None` means the wall clock at generation time
    pub as_of: Option<DateTime<Utc>>,

    pub token: TokenProfile,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            horizon_days: 180,
            start_price: 0.75,
            price_volatility: 0.03,
            base_volume: 500_000.0,
            base_liquidity: 2_000_000.0,
            seed: 0,
            as_of: None,
            token: TokenProfile::default(),
        }
    }
}

impl DatasetConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: DatasetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric field. Nothing is partially applied on failure.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_horizon(self.horizon_days)?;
        check_positive("start_price", self.start_price)?;
        check_positive("base_volume", self.base_volume)?;
        check_positive("base_liquidity", self.base_liquidity)?;
        if !self.price_volatility.is_finite() || self.price_volatility < 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "price_volatility must be a finite non-negative number, got {}",
                self.price_volatility
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_horizon(horizon_days: i64) -> Result<(), CoreError> {
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(CoreError::InvalidParameter(format!(
            "horizon_days {horizon_days} exceeds maximum of {MAX_HORIZON_DAYS}"
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidParameter(format!(
            "{name} must be a finite positive number, got {value}"
        )))
    }
}

/// The five daily histories of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    pub price: Series,
    pub volume: Series,
    pub liquidity: Series,
    pub holders: Series,
    pub transactions: Series,
}

impl SeriesSet {
    pub fn get(&self, kind: SeriesKind) -> &Series {
        match kind {
            SeriesKind::Price => &self.price,
            SeriesKind::Volume => &self.volume,
            SeriesKind::Liquidity => &self.liquidity,
            SeriesKind::Holders => &self.holders,
            SeriesKind::Transactions => &self.transactions,
        }
    }
}

/// The complete in-memory dataset handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub token: TokenProfile,
    /// Timestamp of the last point of every series
    pub as_of: DateTime<Utc>,
    pub series: SeriesSet,
    /// Price summary
    pub summary: SummaryStats,
    pub market: MarketSnapshot,
    pub distributions: Distributions,
}
