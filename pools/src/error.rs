//! Error types for pool primitives and pool providers

use thiserror::Error;

/// Result type alias for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Error types raised by tokens, pools, prices and providers
#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid chain: {0}")]
    InvalidChain(String),

    #[error("Invalid pool: {message}")]
    InvalidPool { message: String },

    #[error("Token {token} is not part of pool {pool}")]
    TokenNotInPool { token: String, pool: String },

    #[error(
        "Currency mismatch: price {price_base}/{price_quote} cannot convert an amount of {amount}"
    )]
    CurrencyMismatch {
        price_base: String,
        price_quote: String,
        amount: String,
    },

    #[error("Token mismatch: cannot combine an amount of {expected} with an amount of {actual}")]
    TokenMismatch { expected: String, actual: String },

    #[error("Zero denominator in {context}")]
    ZeroDenominator { context: String },

    #[error("Invalid route: {message}")]
    InvalidRoute { message: String },

    #[error("Pool provider error: {message}")]
    Provider { message: String },

    #[error("Parse error: {field} - {message}")]
    Parse { field: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PoolError {
    /// Create an invalid pool error
    pub fn invalid_pool<S: Into<String>>(message: S) -> Self {
        Self::InvalidPool {
            message: message.into(),
        }
    }

    /// Create an invalid route error
    pub fn invalid_route<S: Into<String>>(message: S) -> Self {
        Self::InvalidRoute {
            message: message.into(),
        }
    }

    /// Create a provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a zero denominator error
    pub fn zero_denominator<S: Into<String>>(context: S) -> Self {
        Self::ZeroDenominator {
            context: context.into(),
        }
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(field: S, message: S) -> Self {
        Self::Parse {
            field: field.into(),
            message: message.into(),
        }
    }
}
