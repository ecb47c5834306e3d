//! Error types for the gas model

use qenus_pools::{Chain, PoolError};
use thiserror::Error;

/// Result type alias for gas model operations
pub type Result<T> = std::result::Result<T, GasModelError>;

/// Error types for building and using a gas model
#[derive(Error, Debug)]
pub enum GasModelError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("No liquidity pool on {chain}: {message}")]
    NoLiquidityPool { chain: Chain, message: String },

    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Config loading error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GasModelError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing-liquidity error
    pub fn no_liquidity_pool<S: Into<String>>(chain: Chain, message: S) -> Self {
        Self::NoLiquidityPool {
            chain,
            message: message.into(),
        }
    }

    /// Whether a price was applied to an amount of the wrong token
    pub fn is_currency_mismatch(&self) -> bool {
        matches!(self, GasModelError::Pool(PoolError::CurrencyMismatch { .. }))
    }
}
