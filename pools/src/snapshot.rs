//! JSON pool snapshots
//!
//! A snapshot lists the tokens of one chain and the pools between them.
//! Large on-chain quantities are kept as strings to avoid precision loss.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{Chain, FeeTier, Pool, PoolError, Result, Token, TokenInfo};

/// Serialized set of pools on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub chain: Chain,
    pub tokens: Vec<TokenInfo>,
    pub pools: Vec<PoolSnapshotEntry>,
}

/// One pool; tokens are referenced by symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PoolSnapshotEntry {
    Concentrated {
        token0: String,
        token1: String,
        fee: FeeTier,
        sqrt_price_x96: String,
        liquidity: String,
    },
    ConstantProduct {
        token0: String,
        token1: String,
        reserve0: String,
        reserve1: String,
    },
}

impl PoolSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Look a token up by symbol (case-insensitive) or by address
    pub fn token(&self, symbol_or_address: &str) -> Result<Token> {
        self.tokens
            .iter()
            .find(|t| {
                t.symbol.eq_ignore_ascii_case(symbol_or_address)
                    || t.address.to_string().eq_ignore_ascii_case(symbol_or_address)
            })
            .map(|t| t.to_token(self.chain))
            .ok_or_else(|| PoolError::parse("token".to_string(), format!("unknown token {}", symbol_or_address)))
    }

    /// Materialize every pool, in snapshot order
    pub fn to_pools(&self) -> Result<Vec<Pool>> {
        let tokens: HashMap<String, Token> = self
            .tokens
            .iter()
            .map(|t| (t.symbol.to_uppercase(), t.to_token(self.chain)))
            .collect();
        let resolve = |symbol: &str| {
            tokens
                .get(&symbol.to_uppercase())
                .cloned()
                .ok_or_else(|| PoolError::parse("token".to_string(), format!("unknown token {}", symbol)))
        };

        self.pools
            .iter()
            .map(|entry| match entry {
                PoolSnapshotEntry::Concentrated {
                    token0,
                    token1,
                    fee,
                    sqrt_price_x96,
                    liquidity,
                } => Pool::concentrated(
                    resolve(token0)?,
                    resolve(token1)?,
                    *fee,
                    parse_u256("sqrt_price_x96", sqrt_price_x96)?,
                    parse_u128("liquidity", liquidity)?,
                ),
                PoolSnapshotEntry::ConstantProduct {
                    token0,
                    token1,
                    reserve0,
                    reserve1,
                } => Pool::constant_product(
                    resolve(token0)?,
                    resolve(token1)?,
                    parse_u128("reserve0", reserve0)?,
                    parse_u128("reserve1", reserve1)?,
                ),
            })
            .collect()
    }
}

fn parse_u256(field: &str, value: &str) -> Result<U256> {
    U256::from_str(value).map_err(|e| PoolError::parse(field.to_string(), e.to_string()))
}

fn parse_u128(field: &str, value: &str) -> Result<u128> {
    value
        .parse::<u128>()
        .map_err(|e| PoolError::parse(field.to_string(), e.to_string()))
}
