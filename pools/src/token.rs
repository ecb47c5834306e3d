//! ERC20 token identity

use std::fmt;
use std::hash::{Hash, Hasher};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::Chain;

/// A fungible token on a specific chain.
///
/// Two tokens are equal when they live on the same chain at the same
/// address; symbol and decimals are descriptive only.
#[derive(Debug, Clone)]
pub struct Token {
    pub chain: Chain,
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

impl Token {
    /// Create a new token
    pub fn new<S: Into<String>>(chain: Chain, address: Address, symbol: S, decimals: u8) -> Self {
        Self {
            chain,
            address,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Whether this token is ordered before `other` by address
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.symbol, self.address)
    }
}

/// Chain-less token description used by config files and snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: Address,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new<S: Into<String>>(symbol: S, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }

    /// Bind this description to a chain
    pub fn to_token(&self, chain: Chain) -> Token {
        Token::new(chain, self.address, self.symbol.clone(), self.decimals)
    }
}

impl From<&Token> for TokenInfo {
    fn from(token: &Token) -> Self {
        Self::new(token.symbol.clone(), token.address, token.decimals)
    }
}
