//! Exchange rates between two tokens

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use crate::{CurrencyAmount, PoolError, Result, Token};

/// Raw-unit exchange rate: one raw unit of `base` is worth
/// `numerator / denominator` raw units of `quote`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    base: Token,
    quote: Token,
    numerator: BigUint,
    denominator: BigUint,
}

impl Price {
    pub fn new(base: Token, quote: Token, numerator: BigUint, denominator: BigUint) -> Result<Self> {
        if denominator.is_zero() {
            return Err(PoolError::zero_denominator(format!(
                "price {}/{}",
                base.symbol, quote.symbol
            )));
        }
        Ok(Self {
            base,
            quote,
            numerator,
            denominator,
        })
    }

    pub fn base(&self) -> &Token {
        &self.base
    }

    pub fn quote_token(&self) -> &Token {
        &self.quote
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

    /// Same rate with base and quote swapped. Fails for a zero price.
    pub fn invert(&self) -> Result<Price> {
        Price::new(
            self.quote.clone(),
            self.base.clone(),
            self.denominator.clone(),
            self.numerator.clone(),
        )
    }

    /// Convert an amount of the base token into the quote token.
    ///
    /// The amount must be denominated in `base`; anything else means the
    /// price was oriented the wrong way and is reported, never corrected.
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount> {
        if amount.token() != &self.base {
            return Err(PoolError::CurrencyMismatch {
                price_base: self.base.to_string(),
                price_quote: self.quote.to_string(),
                amount: amount.token().to_string(),
            });
        }
        CurrencyAmount::from_fraction(
            self.quote.clone(),
            amount.numerator() * &self.numerator,
            amount.denominator() * &self.denominator,
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} = {}/{}",
            self.quote.symbol, self.base.symbol, self.numerator, self.denominator
        )
    }
}
