//! Exact-arithmetic token amounts

use std::fmt;

use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{PoolError, Result, Token};

/// Convert an on-chain word into an arbitrary-precision integer
pub fn u256_to_biguint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

/// A non-negative amount of `token`, held as an exact fraction of raw units.
///
/// Raw amounts are whole numbers; fractional values only appear after a price
/// conversion and are kept until [`CurrencyAmount::quotient`] floors them.
#[derive(Debug, Clone)]
pub struct CurrencyAmount {
    token: Token,
    numerator: BigUint,
    denominator: BigUint,
}

impl CurrencyAmount {
    /// Amount of `raw` base units of `token`
    pub fn from_raw<T: Into<BigUint>>(token: Token, raw: T) -> Self {
        Self {
            token,
            numerator: raw.into(),
            denominator: BigUint::one(),
        }
    }

    /// Amount expressed as `numerator / denominator` base units
    pub fn from_fraction(token: Token, numerator: BigUint, denominator: BigUint) -> Result<Self> {
        if denominator.is_zero() {
            return Err(PoolError::zero_denominator(format!("amount of {}", token.symbol)));
        }
        Ok(Self {
            token,
            numerator,
            denominator,
        })
    }

    /// Zero amount of `token`
    pub fn zero(token: Token) -> Self {
        Self::from_raw(token, BigUint::zero())
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn numerator(&self) -> &BigUint {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigUint {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Whole raw units, rounded down
    pub fn quotient(&self) -> BigUint {
        &self.numerator / &self.denominator
    }

    /// Exact sum of two amounts of the same token
    pub fn checked_add(&self, other: &CurrencyAmount) -> Result<Self> {
        self.ensure_same_token(other)?;
        Ok(Self {
            token: self.token.clone(),
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        })
    }

    /// Exact difference of two amounts of the same token, floored at zero
    pub fn saturating_sub(&self, other: &CurrencyAmount) -> Result<Self> {
        self.ensure_same_token(other)?;
        let lhs = &self.numerator * &other.denominator;
        let rhs = &other.numerator * &self.denominator;
        let numerator = if lhs > rhs { lhs - rhs } else { BigUint::zero() };
        Ok(Self {
            token: self.token.clone(),
            numerator,
            denominator: &self.denominator * &other.denominator,
        })
    }

    /// Decimal rendering in whole-token units with `places` fractional digits, truncated
    pub fn to_fixed(&self, places: u32) -> String {
        let scale = BigUint::from(10u32).pow(places);
        let unit = BigUint::from(10u32).pow(self.token.decimals as u32);
        let scaled = (&self.numerator * &scale) / (&self.denominator * unit);

        if places == 0 {
            return scaled.to_string();
        }
        let whole = &scaled / &scale;
        let fraction = (&scaled % &scale).to_string();
        format!("{}.{:0>width$}", whole, fraction, width = places as usize)
    }

    fn ensure_same_token(&self, other: &CurrencyAmount) -> Result<()> {
        if self.token != other.token {
            return Err(PoolError::TokenMismatch {
                expected: self.token.to_string(),
                actual: other.token.to_string(),
            });
        }
        Ok(())
    }
}

impl PartialEq for CurrencyAmount {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
            && &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

impl Eq for CurrencyAmount {}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_fixed(6), self.token.symbol)
    }
}
