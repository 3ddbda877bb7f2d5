use serde::{Deserialize, Serialize};
use std::fmt;

/// Which donut chart a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionKind {
    /// Trades bucketed by dollar size
    TradeSize,
    /// Supply held by wallet rank groups
    WalletConcentration,
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionKind::TradeSize => write!(f, "Trade size"),
            DistributionKind::WalletConcentration => write!(f, "Wallet concentration"),
        }
    }
}

/// One labelled slice of a distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSegment {
    pub label: String,
    pub percentage: u32,
}

impl DistributionSegment {
    pub fn new(label: impl Into<String>, percentage: u32) -> Self {
        Self {
            label: label.into(),
            percentage,
        }
    }
}

/// A categorical breakdown whose percentages sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub kind: DistributionKind,
    pub segments: Vec<DistributionSegment>,
}

impl Distribution {
    pub fn trade_size() -> Self {
        Self {
            kind: DistributionKind::TradeSize,
            segments: vec![
                DistributionSegment::new("$0-$100", 45),
                DistributionSegment::new("$100-$500", 32),
                DistributionSegment::new("$500-$1k", 12),
                DistributionSegment::new("$1k-$10k", 8),
                DistributionSegment::new("$10k+", 3),
            ],
        }
    }

    pub fn wallet_concentration() -> Self {
        Self {
            kind: DistributionKind::WalletConcentration,
            segments: vec![
                DistributionSegment::new("Top 10 wallets", 28),
                DistributionSegment::new("Next 40 wallets", 22),
                DistributionSegment::new("Next 100 wallets", 18),
                DistributionSegment::new("Next 1000 wallets", 22),
                DistributionSegment::new("All others", 10),
            ],
        }
    }

    pub fn find(&self, label: &str) -> Option<&DistributionSegment> {
        self.segments.iter().find(|s| s.label == label)
    }

    pub fn total_percentage(&self) -> u32 {
        self.segments.iter().map(|s| s.percentage).sum()
    }
}

/// Both donut charts of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distributions {
    pub trade_size: Distribution,
    pub wallet_concentration: Distribution,
}

impl Distributions {
    pub fn get(&self, kind: DistributionKind) -> &Distribution {
        match kind {
            DistributionKind::TradeSize => &self.trade_size,
            DistributionKind::WalletConcentration => &self.wallet_concentration,
        }
    }
}

impl Default for Distributions {
    fn default() -> Self {
        Self {
            trade_size: Distribution::trade_size(),
            wallet_concentration: Distribution::wallet_concentration(),
        }
    }
}
