//! Concentrated-liquidity fee tiers

use serde::{Deserialize, Serialize};

use crate::PoolError;

/// Fee tier of a concentrated-liquidity pool, in hundredths of a basis point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    /// All tiers from highest fee to lowest
    pub const DESCENDING: [FeeTier; 4] = [FeeTier::High, FeeTier::Medium, FeeTier::Low, FeeTier::Lowest];

    /// Fee in hundredths of a basis point (3000 = 0.3%)
    pub fn fee(&self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10000,
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = PoolError;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        match fee {
            100 => Ok(FeeTier::Lowest),
            500 => Ok(FeeTier::Low),
            3000 => Ok(FeeTier::Medium),
            10000 => Ok(FeeTier::High),
            other => Err(PoolError::parse("fee".to_string(), format!("unsupported fee tier {}", other))),
        }
    }
}

impl From<FeeTier> for u32 {
    fn from(tier: FeeTier) -> Self {
        tier.fee()
    }
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fee())
    }
}
