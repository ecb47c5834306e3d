//! # Qenus Gas Model
//!
//! Off-chain gas cost estimation for swap routes that mix concentrated
//! liquidity pools and constant-product pairs.
//!
//! A [`GasModelFactory`] resolves the reference pools needed to price gas on
//! one chain; the [`GasModel`] it returns converts each route's gas units into
//! the wrapped native token, the caller's quote token and a USD token.

pub mod config;
pub mod error;
pub mod segmenter;
pub mod estimator;
pub mod locator;
pub mod model;

pub use config::{ConcentratedCosts, ConstantProductCosts, GasModelConfig, NetworkConfig};
pub use error::{GasModelError, Result};
pub use segmenter::{partition_by_family, RouteSegment};
pub use estimator::{GasEstimator, RouteGasEstimate};
pub use locator::ReferencePoolLocator;
pub use model::{GasCostEstimate, GasModel, GasModelFactory, TradeType};

/// Current version of the gas model
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
