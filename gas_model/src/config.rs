//! Configuration management for the gas model
//!
//! Holds the per-chain gas cost constants and reference tokens. Defaults are
//! built in; files and `QENUS_GAS__*` environment variables override them.

use std::collections::HashMap;
use std::path::Path;

use alloy_primitives::address;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use qenus_pools::{Chain, FeeTier, Token, TokenInfo};

use crate::error::{GasModelError, Result};

/// Gas model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasModelConfig {
    /// Per-chain tokens and cost constants
    pub networks: HashMap<Chain, NetworkConfig>,

    /// Fee tiers searched for the USD reference pool, in priority order
    pub usd_pool_fee_tiers: Vec<FeeTier>,

    /// Fee tiers searched for the native/quote reference pool, in priority order
    pub quote_pool_fee_tiers: Vec<FeeTier>,

    /// Fall back to a constant-product pair when no concentrated native/quote pool exists
    #[serde(default)]
    pub constant_product_quote_fallback: bool,
}

/// Chain-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Wrapped native currency gas is denominated in
    pub wrapped_native: TokenInfo,

    /// USD-pegged tokens acceptable as the USD reference
    pub usd_tokens: Vec<TokenInfo>,

    pub concentrated: ConcentratedCosts,

    pub constant_product: ConstantProductCosts,
}

/// Gas costs of concentrated-liquidity hops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcentratedCosts {
    /// Paid once per run of consecutive concentrated hops
    pub base_swap_cost: u64,
    /// Paid for every hop in a run
    pub cost_per_hop: u64,
    /// Paid per initialized tick crossed across the route
    pub cost_per_init_tick: u64,
    /// Currently never charged
    #[serde(default)]
    pub cost_per_uninit_tick: u64,
}

/// Gas costs of constant-product hops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantProductCosts {
    /// Paid once per run of consecutive constant-product hops
    pub base_swap_cost: u64,
    /// Paid for every hop in a run after the first
    pub cost_per_extra_hop: u64,
}

impl NetworkConfig {
    /// Wrapped native token bound to `chain`
    pub fn wrapped_native_token(&self, chain: Chain) -> Token {
        self.wrapped_native.to_token(chain)
    }

    /// USD tokens bound to `chain`
    pub fn usd_token_list(&self, chain: Chain) -> Vec<Token> {
        self.usd_tokens.iter().map(|t| t.to_token(chain)).collect()
    }
}

impl Default for ConcentratedCosts {
    fn default() -> Self {
        Self {
            base_swap_cost: 2_000,
            cost_per_hop: 80_000,
            cost_per_init_tick: 31_000,
            cost_per_uninit_tick: 0,
        }
    }
}

impl Default for ConstantProductCosts {
    fn default() -> Self {
        Self {
            base_swap_cost: 135_000,
            cost_per_extra_hop: 50_000,
        }
    }
}

impl Default for GasModelConfig {
    fn default() -> Self {
        Self {
            networks: Self::default_networks(),
            usd_pool_fee_tiers: FeeTier::DESCENDING.to_vec(),
            quote_pool_fee_tiers: vec![FeeTier::High, FeeTier::Medium, FeeTier::Low],
            constant_product_quote_fallback: false,
        }
    }
}

impl GasModelConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!(
                "config/{}",
                std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
            )).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("QENUS_GAS").separator("__"))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.usd_pool_fee_tiers.is_empty() {
            return Err(GasModelError::configuration("usd_pool_fee_tiers cannot be empty"));
        }
        if self.quote_pool_fee_tiers.is_empty() {
            return Err(GasModelError::configuration("quote_pool_fee_tiers cannot be empty"));
        }

        for (chain, network) in &self.networks {
            if network
                .usd_tokens
                .iter()
                .any(|t| t.address == network.wrapped_native.address)
            {
                return Err(GasModelError::configuration(format!(
                    "wrapped native token of {} is also listed as a USD token",
                    chain
                )));
            }
        }

        Ok(())
    }

    /// Get configuration for a specific chain
    pub fn network(&self, chain: Chain) -> Result<&NetworkConfig> {
        self.networks
            .get(&chain)
            .ok_or_else(|| GasModelError::configuration(format!("chain {} is not configured", chain)))
    }

    fn default_networks() -> HashMap<Chain, NetworkConfig> {
        let mut networks = HashMap::new();

        networks.insert(
            Chain::Ethereum,
            NetworkConfig {
                wrapped_native: TokenInfo::new("WETH", address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"), 18),
                usd_tokens: vec![
                    TokenInfo::new("DAI", address!("6b175474e89094c44da98b954eedeac495271d0f"), 18),
                    TokenInfo::new("USDC", address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"), 6),
                    TokenInfo::new("USDT", address!("dac17f958d2ee523a2206206994597c13d831ec7"), 6),
                ],
                concentrated: ConcentratedCosts::default(),
                constant_product: ConstantProductCosts::default(),
            },
        );

        networks.insert(
            Chain::Arbitrum,
            NetworkConfig {
                wrapped_native: TokenInfo::new("WETH", address!("82af49447d8a07e3bd95bd0d56f35241523fbab1"), 18),
                usd_tokens: vec![
                    TokenInfo::new("DAI", address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1"), 18),
                    TokenInfo::new("USDC.e", address!("ff970a61a04b1ca14834a43f5de4533ebddb5cc8"), 6),
                    TokenInfo::new("USDC", address!("af88d065e77c8cc2239327c5edb3a432268e5831"), 6),
                    TokenInfo::new("USDT", address!("fd086bc7cd5c481dcc9c85ebe478a1c0b69fcbb9"), 6),
                ],
                concentrated: ConcentratedCosts {
                    base_swap_cost: 5_000,
                    ..ConcentratedCosts::default()
                },
                constant_product: ConstantProductCosts::default(),
            },
        );

        networks.insert(
            Chain::Optimism,
            NetworkConfig {
                wrapped_native: TokenInfo::new("WETH", address!("4200000000000000000000000000000000000006"), 18),
                usd_tokens: vec![
                    TokenInfo::new("DAI", address!("da10009cbd5d07dd0cecc66161fc93d7c9000da1"), 18),
                    TokenInfo::new("USDC.e", address!("7f5c764cbc14f9669b88837ca1490cca17c31607"), 6),
                    TokenInfo::new("USDC", address!("0b2c639c533813f4aa9d7837caf62653d097ff85"), 6),
                    TokenInfo::new("USDT", address!("94b008aa00579c1307b0ef2c499ad98a8ce58e58"), 6),
                ],
                concentrated: ConcentratedCosts::default(),
                constant_product: ConstantProductCosts::default(),
            },
        );

        networks.insert(
            Chain::Base,
            NetworkConfig {
                wrapped_native: TokenInfo::new("WETH", address!("4200000000000000000000000000000000000006"), 18),
                usd_tokens: vec![
                    TokenInfo::new("USDbC", address!("d9aaec86b65d86f6a7b5b1b0c42ffa531710b6ca"), 6),
                    TokenInfo::new("USDC", address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"), 6),
                ],
                concentrated: ConcentratedCosts::default(),
                constant_product: ConstantProductCosts::default(),
            },
        );

        networks.insert(
            Chain::Polygon,
            NetworkConfig {
                wrapped_native: TokenInfo::new("WMATIC", address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"), 18),
                usd_tokens: vec![
                    TokenInfo::new("USDC.e", address!("2791bca1f2de4661ed88a30c99a7a9449aa84174"), 6),
                    TokenInfo::new("USDT", address!("c2132d05d31c914a87c6611c10748aeb04b58e8f"), 6),
                    TokenInfo::new("DAI", address!("8f3cf7ad23cd3cadbd9735aff958023239c6a063"), 18),
                ],
                concentrated: ConcentratedCosts::default(),
                constant_product: ConstantProductCosts::default(),
            },
        );

        networks
    }
}
