//! Liquidity pools of both supported protocol families

use std::fmt;

use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::amount::u256_to_biguint;
use crate::{FeeTier, PoolError, Price, Result, Token};

/// Protocol family of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolFamily {
    /// Tick-based pools keyed by fee tier, priced from `sqrtPriceX96`
    Concentrated,
    /// `x * y = k` pairs priced from reserves
    ConstantProduct,
}

impl fmt::Display for PoolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolFamily::Concentrated => write!(f, "concentrated"),
            PoolFamily::ConstantProduct => write!(f, "constant_product"),
        }
    }
}

/// Family-specific pool state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolState {
    Concentrated {
        fee: FeeTier,
        /// sqrt(token1 / token0) as a Q64.96 number
        sqrt_price_x96: U256,
        /// Active in-range liquidity
        liquidity: u128,
    },
    ConstantProduct {
        reserve0: u128,
        reserve1: u128,
    },
}

/// Lookup key of a pool. Tokens are stored in address order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Token,
    pub token1: Token,
    /// `None` for constant-product pairs
    pub fee: Option<FeeTier>,
}

impl PoolKey {
    pub fn concentrated(token_a: &Token, token_b: &Token, fee: FeeTier) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        Self {
            token0,
            token1,
            fee: Some(fee),
        }
    }

    pub fn constant_product(token_a: &Token, token_b: &Token) -> Self {
        let (token0, token1) = sort_tokens(token_a, token_b);
        Self {
            token0,
            token1,
            fee: None,
        }
    }
}

fn sort_tokens(token_a: &Token, token_b: &Token) -> (Token, Token) {
    if token_a.sorts_before(token_b) {
        (token_a.clone(), token_b.clone())
    } else {
        (token_b.clone(), token_a.clone())
    }
}

/// A pool between two tokens of the same chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    token0: Token,
    token1: Token,
    state: PoolState,
}

impl Pool {
    /// Create a concentrated-liquidity pool.
    ///
    /// Tokens may be given in any order; `sqrt_price_x96` always refers to
    /// token1/token0 of the address-sorted pair, as on chain.
    pub fn concentrated(
        token_a: Token,
        token_b: Token,
        fee: FeeTier,
        sqrt_price_x96: U256,
        liquidity: u128,
    ) -> Result<Self> {
        validate_pair(&token_a, &token_b)?;
        let (token0, token1) = sort_tokens(&token_a, &token_b);
        Ok(Self {
            token0,
            token1,
            state: PoolState::Concentrated {
                fee,
                sqrt_price_x96,
                liquidity,
            },
        })
    }

    /// Create a constant-product pair from per-token reserves.
    ///
    /// Reserves follow the argument order and are swapped with the tokens
    /// when the tokens need sorting.
    pub fn constant_product(
        token_a: Token,
        token_b: Token,
        reserve_a: u128,
        reserve_b: u128,
    ) -> Result<Self> {
        validate_pair(&token_a, &token_b)?;
        let (token0, token1, reserve0, reserve1) = if token_a.sorts_before(&token_b) {
            (token_a, token_b, reserve_a, reserve_b)
        } else {
            (token_b, token_a, reserve_b, reserve_a)
        };
        Ok(Self {
            token0,
            token1,
            state: PoolState::ConstantProduct { reserve0, reserve1 },
        })
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn family(&self) -> PoolFamily {
        match self.state {
            PoolState::Concentrated { .. } => PoolFamily::Concentrated,
            PoolState::ConstantProduct { .. } => PoolFamily::ConstantProduct,
        }
    }

    /// Fee tier, for concentrated pools only
    pub fn fee(&self) -> Option<FeeTier> {
        match self.state {
            PoolState::Concentrated { fee, .. } => Some(fee),
            PoolState::ConstantProduct { .. } => None,
        }
    }

    pub fn key(&self) -> PoolKey {
        PoolKey {
            token0: self.token0.clone(),
            token1: self.token1.clone(),
            fee: self.fee(),
        }
    }

    pub fn involves(&self, token: &Token) -> bool {
        &self.token0 == token || &self.token1 == token
    }

    /// The pool's other token, or `None` if `token` is not in the pool
    pub fn other_token(&self, token: &Token) -> Option<&Token> {
        if &self.token0 == token {
            Some(&self.token1)
        } else if &self.token1 == token {
            Some(&self.token0)
        } else {
            None
        }
    }

    /// Liquidity magnitude used to rank candidate pools.
    ///
    /// Constant-product pairs report `sqrt(reserve0 * reserve1)`.
    pub fn liquidity(&self) -> u128 {
        match self.state {
            PoolState::Concentrated { liquidity, .. } => liquidity,
            PoolState::ConstantProduct { reserve0, reserve1 } => {
                let k = U256::from(reserve0) * U256::from(reserve1);
                u128::try_from(k.root(2)).unwrap_or(u128::MAX)
            }
        }
    }

    /// Mid-price with `base` as the base token
    pub fn mid_price(&self, base: &Token) -> Result<Price> {
        let token0_price = self.token0_price()?;
        if base == &self.token0 {
            Ok(token0_price)
        } else if base == &self.token1 {
            token0_price.invert()
        } else {
            Err(PoolError::TokenNotInPool {
                token: base.to_string(),
                pool: self.to_string(),
            })
        }
    }

    /// Price of token0 in token1
    fn token0_price(&self) -> Result<Price> {
        let (numerator, denominator) = match self.state {
            PoolState::Concentrated { sqrt_price_x96, .. } => {
                let sqrt_price = u256_to_biguint(sqrt_price_x96);
                (&sqrt_price * &sqrt_price, BigUint::one() << 192)
            }
            PoolState::ConstantProduct { reserve0, reserve1 } => {
                (BigUint::from(reserve1), BigUint::from(reserve0))
            }
        };
        Price::new(self.token0.clone(), self.token1.clone(), numerator, denominator)
    }
}

fn validate_pair(token_a: &Token, token_b: &Token) -> Result<()> {
    if token_a.chain != token_b.chain {
        return Err(PoolError::invalid_pool(format!(
            "tokens {} and {} live on different chains",
            token_a, token_b
        )));
    }
    if token_a == token_b {
        return Err(PoolError::invalid_pool(format!("pool of {} with itself", token_a)));
    }
    Ok(())
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state {
            PoolState::Concentrated { fee, .. } => write!(
                f,
                "{}/{}@{}",
                self.token0.symbol, self.token1.symbol, fee
            ),
            PoolState::ConstantProduct { .. } => {
                write!(f, "{}/{}", self.token0.symbol, self.token1.symbol)
            }
        }
    }
}
