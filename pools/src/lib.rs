//! # Qenus Pools
//!
//! Pool, token and exact-amount primitives shared by the gas model.
//! Pools come in two protocol families (concentrated liquidity and constant
//! product) and are fetched in batches through the provider traits.

pub mod error;
pub mod token;
pub mod fee_tier;
pub mod amount;
pub mod price;
pub mod pool;
pub mod route;
pub mod provider;
pub mod snapshot;

pub use error::{PoolError, Result};
pub use token::{Token, TokenInfo};
pub use fee_tier::FeeTier;
pub use amount::CurrencyAmount;
pub use price::Price;
pub use pool::{Pool, PoolFamily, PoolKey, PoolState};
pub use route::{Route, RouteQuote};
pub use provider::{
    ConcentratedPoolProvider, ConstantProductPoolProvider, InMemoryPoolProvider, PoolAccessor,
};
pub use snapshot::{PoolSnapshot, PoolSnapshotEntry};

pub use alloy_primitives::{Address, U256};

/// Current version of the pools crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported blockchain networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Chain {
    #[serde(rename = "ethereum")]
    Ethereum,
    #[serde(rename = "arbitrum")]
    Arbitrum,
    #[serde(rename = "optimism")]
    Optimism,
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "polygon")]
    Polygon,
}

impl Chain {
    /// Every supported chain, in declaration order
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Arbitrum,
        Chain::Optimism,
        Chain::Base,
        Chain::Polygon,
    ];

    /// Get the chain ID for this network
    pub fn chain_id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Arbitrum => 42161,
            Chain::Optimism => 10,
            Chain::Base => 8453,
            Chain::Polygon => 137,
        }
    }

    /// Get the human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Arbitrum => "arbitrum",
            Chain::Optimism => "optimism",
            Chain::Base => "base",
            Chain::Polygon => "polygon",
        }
    }

    /// Symbol of the wrapped currency gas is paid in
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Polygon => "WMATIC",
            _ => "WETH",
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Chain {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ethereum" | "eth" | "mainnet" => Ok(Chain::Ethereum),
            "arbitrum" | "arb" => Ok(Chain::Arbitrum),
            "optimism" | "op" => Ok(Chain::Optimism),
            "base" => Ok(Chain::Base),
            "polygon" | "matic" => Ok(Chain::Polygon),
            _ => Err(PoolError::InvalidChain(s.to_string())),
        }
    }
}
