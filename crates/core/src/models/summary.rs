use serde::{Deserialize, Serialize};

/// A value together with the timestamp at which it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremePoint {
    pub value: f64,
    pub timestamp: i64,
}

/// Point-in-time summary of a single series. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Value of the last point
    pub current: f64,

    /// Percentage change against the point one day back
    pub change_24h: f64,

    /// Percentage change against the point seven days back
    pub change_7d: f64,

    /// Highest value (earliest on ties)
    pub all_time_high: ExtremePoint,

    /// Lowest value (earliest on ties)
    pub all_time_low: ExtremePoint,
}

/// Liquidity and volume attributed to one trading pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMarket {
    pub pair: String,
    pub liquidity: f64,
    pub volume_24h: f64,
}

/// Holder and social figures shown in the stats panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub holders: u64,
    pub transactions_24h: u64,
    pub twitter_followers: u64,
    pub discord_members: u64,
    pub telegram_members: u64,
}

/// Valuation figures derived from the current price and token supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyMetrics {
    /// current price × circulating supply
    pub market_cap: f64,
    /// current price × max supply
    pub fully_diluted_valuation: f64,
    pub circulating_supply: u64,
    pub total_supply: u64,
    pub max_supply: u64,
}

/// Everything the header and stats panel display, computed from the latest points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub volume_24h: f64,
    pub volume_change_24h: f64,
    pub total_liquidity: f64,
    pub liquidity_change_24h: f64,
    pub pairs: Vec<PairMarket>,
    pub community: CommunityStats,
    pub supply: SupplyMetrics,
}
