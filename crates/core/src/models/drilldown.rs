use serde::{Deserialize, Serialize};

use super::series::{Series, TimePoint};

/// A named share of a whole, in integer percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub name: String,
    pub percentage: u32,
}

/// Trading statistics synthesized for one selected volume bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetrics {
    pub trade_count: u64,
    pub avg_trade_size: f64,
    pub largest_trade: f64,
    pub unique_wallets: u64,
    pub new_wallets: u64,
    /// Pair shares, summing to 100
    pub top_pairs: Vec<ShareEntry>,
}

/// Drill-down of one volume bar: 24 hourly values summing to the bar's total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeDetail {
    /// The bar that was expanded
    pub parent: TimePoint,
    pub hourly: Series,
    pub metrics: VolumeMetrics,
}

/// How busy a wallet group is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl ActivityLevel {
    pub(crate) const ORDERED: [ActivityLevel; 5] = [
        ActivityLevel::VeryHigh,
        ActivityLevel::High,
        ActivityLevel::Medium,
        ActivityLevel::Low,
        ActivityLevel::VeryLow,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::VeryHigh => "Very High",
            ActivityLevel::High => "High",
            ActivityLevel::Medium => "Medium",
            ActivityLevel::Low => "Low",
            ActivityLevel::VeryLow => "Very Low",
        }
    }
}

/// Sub-metrics of one trade-size segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSizeDetail {
    pub transactions: u64,
    pub avg_trade_value: f64,
    /// Percent, rounded to two decimals
    pub change_from_last_week: f64,
    pub top_traders: u64,
    /// Pairing shares, summing to 100
    pub popular_pairings: Vec<ShareEntry>,
}

/// Sub-metrics of one wallet-concentration segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletDetail {
    pub num_wallets: u64,
    pub total_holdings: f64,
    pub avg_holding: f64,
    pub activity: ActivityLevel,
    pub holding_period_days: u64,
    /// Asset shares, summing to 100
    pub top_assets: Vec<ShareEntry>,
}

/// Drill-down of one donut segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SegmentDetail {
    TradeSize(TradeSizeDetail),
    Wallet(WalletDetail),
}

impl SegmentDetail {
    /// The percentage breakdown carried by this detail.
    pub fn shares(&self) -> &[ShareEntry] {
        match self {
            SegmentDetail::TradeSize(d) => &d.popular_pairings,
            SegmentDetail::Wallet(d) => &d.top_assets,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pressure {
    Buying,
    Selling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorType {
    Institutional,
    Retail,
}

/// Narrative flags shown next to the hourly price detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSentiment {
    pub high_volatility: bool,
    pub pressure: Pressure,
    pub investor_type: InvestorType,
}

/// Hourly price path around one selected daily price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetail {
    /// The selected daily point; `hourly` contains it at its own timestamp
    pub anchor: TimePoint,
    pub hourly: Series,
    pub trend: Trend,
    /// Absolute percent move from the first hourly point to the anchor
    pub change_pct: f64,
    pub sentiment: MarketSentiment,
}
