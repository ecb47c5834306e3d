//! Gas model assembly and gas cost conversion
//!
//! [`GasModelFactory`] resolves the reference pools for a chain and quote
//! token once; the resulting [`GasModel`] then prices any number of routes
//! without further I/O.

use alloy_primitives::U256;
use qenus_pools::{
    Chain, ConcentratedPoolProvider, ConstantProductPoolProvider, CurrencyAmount, Pool, PoolError,
    Price, RouteQuote, Token,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GasModelConfig;
use crate::error::{GasModelError, Result};
use crate::estimator::{GasEstimator, RouteGasEstimate};
use crate::locator::ReferencePoolLocator;

/// Direction of the quote being adjusted for gas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// Fixed input; the quote is an output amount
    ExactIn,
    /// Fixed output; the quote is an input amount
    ExactOut,
}

/// Gas cost of one route in every denomination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasCostEstimate {
    pub gas_estimate: U256,
    pub gas_cost_in_native: CurrencyAmount,
    pub gas_cost_in_quote_token: CurrencyAmount,
    pub gas_cost_in_usd: CurrencyAmount,
}

impl GasCostEstimate {
    /// Quote net of gas, for ranking routes against each other.
    ///
    /// Exact-in output shrinks by the gas cost (never below zero); exact-out
    /// input grows by it. `quote` must be in the quote token.
    pub fn adjust_quote(&self, quote: &CurrencyAmount, trade_type: TradeType) -> Result<CurrencyAmount> {
        let adjusted = match trade_type {
            TradeType::ExactIn => quote.saturating_sub(&self.gas_cost_in_quote_token)?,
            TradeType::ExactOut => quote.checked_add(&self.gas_cost_in_quote_token)?,
        };
        Ok(adjusted)
    }
}

/// How native gas cost becomes quote-token cost
#[derive(Debug, Clone)]
enum QuoteConversion {
    /// Quote token is the wrapped native token
    Native,
    /// Priced through a native/quote pool; `price` has native as base
    Pool { pool: Pool, price: Price },
    /// No native/quote pool; costs report as zero
    Unavailable,
}

/// Prices routes in gas for one chain, gas price and quote token
#[derive(Debug, Clone)]
pub struct GasModel {
    chain: Chain,
    gas_price: U256,
    quote_token: Token,
    estimator: GasEstimator,
    usd_pool: Pool,
    usd_price: Price,
    quote_conversion: QuoteConversion,
}

impl GasModel {
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// Gas price in wei per gas unit
    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn quote_token(&self) -> &Token {
        &self.quote_token
    }

    pub fn wrapped_native(&self) -> &Token {
        self.estimator.wrapped_native()
    }

    pub fn usd_pool(&self) -> &Pool {
        &self.usd_pool
    }

    /// USD token of the selected USD reference pool
    pub fn usd_token(&self) -> &Token {
        self.usd_price.quote_token()
    }

    /// Native/quote reference pool, if one was needed and found
    pub fn native_pool(&self) -> Option<&Pool> {
        match &self.quote_conversion {
            QuoteConversion::Pool { pool, .. } => Some(pool),
            _ => None,
        }
    }

    /// Gas units of `quote` and their cost in native, quote token and USD
    pub fn estimate_gas_cost(&self, quote: &RouteQuote) -> Result<GasCostEstimate> {
        let RouteGasEstimate {
            gas_units,
            native_cost,
        } = self.estimator.estimate(quote, self.gas_price);

        let (gas_cost_in_quote_token, gas_cost_in_usd) = match &self.quote_conversion {
            QuoteConversion::Native => {
                let usd = self.usd_price.quote(&native_cost)?;
                (native_cost.clone(), usd)
            }
            QuoteConversion::Pool { price, .. } => {
                let in_quote = price.quote(&native_cost)?;
                let usd = self.usd_price.quote(&native_cost)?;
                (in_quote, usd)
            }
            QuoteConversion::Unavailable => {
                warn!(
                    chain = %self.chain,
                    quote_token = %self.quote_token,
                    gas_units = %gas_units,
                    "No native/quote pool, gas cost not accounted for"
                );
                (
                    CurrencyAmount::zero(self.quote_token.clone()),
                    CurrencyAmount::zero(self.usd_token().clone()),
                )
            }
        };

        Ok(GasCostEstimate {
            gas_estimate: gas_units,
            gas_cost_in_native: native_cost,
            gas_cost_in_quote_token,
            gas_cost_in_usd,
        })
    }

    /// Estimate several routes; one failing route does not affect the others
    pub fn estimate_many(&self, quotes: &[RouteQuote]) -> Vec<Result<GasCostEstimate>> {
        quotes
            .iter()
            .enumerate()
            .map(|(index, quote)| {
                let result = self.estimate_gas_cost(quote);
                if let Err(e) = &result {
                    warn!(route = index, error = %e, "Failed to estimate route gas");
                }
                result
            })
            .collect()
    }
}

/// Builds [`GasModel`]s from configuration and pool providers
#[derive(Debug, Clone, Default)]
pub struct GasModelFactory {
    config: GasModelConfig,
}

impl GasModelFactory {
    pub fn new(config: GasModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GasModelConfig {
        &self.config
    }

    /// Resolve reference pools and return a model ready to price routes.
    ///
    /// The USD pool and the native/quote pool are looked up concurrently.
    /// A missing USD pool or an unconfigured chain is an error; a missing or
    /// unpriceable native/quote pool only degrades the model.
    pub async fn build_gas_model<A, B>(
        &self,
        chain: Chain,
        gas_price: U256,
        concentrated_provider: &A,
        constant_product_provider: &B,
        quote_token: &Token,
    ) -> Result<GasModel>
    where
        A: ConcentratedPoolProvider + ?Sized,
        B: ConstantProductPoolProvider + ?Sized,
    {
        let network = self.config.network(chain)?;
        if quote_token.chain != chain {
            return Err(GasModelError::configuration(format!(
                "quote token {} is on {}, not {}",
                quote_token, quote_token.chain, chain
            )));
        }

        let locator = ReferencePoolLocator::new(
            chain,
            network,
            &self.config.usd_pool_fee_tiers,
            &self.config.quote_pool_fee_tiers,
        );
        let estimator = GasEstimator::new(chain, network.clone());
        let native = estimator.wrapped_native().clone();
        let quote_is_native = quote_token == &native;

        let (usd_pool, native_pool) = futures::try_join!(
            locator.usd_pool(concentrated_provider),
            async {
                if quote_is_native {
                    Ok(None)
                } else {
                    self.native_reference_pool(
                        &locator,
                        concentrated_provider,
                        constant_product_provider,
                        quote_token,
                    )
                    .await
                }
            }
        )?;

        let usd_price = usd_pool.mid_price(&native)?;
        let quote_conversion = if quote_is_native {
            QuoteConversion::Native
        } else {
            match native_pool {
                Some(pool) => match pool.mid_price(&native) {
                    Ok(price) if !price.is_zero() => QuoteConversion::Pool { pool, price },
                    Ok(_) | Err(PoolError::ZeroDenominator { .. }) => {
                        warn!(
                            chain = %chain,
                            pool = %pool,
                            "Native/quote reference pool has no usable price, quote and USD gas costs will be zero"
                        );
                        QuoteConversion::Unavailable
                    }
                    Err(e) => return Err(e.into()),
                },
                None => {
                    warn!(
                        chain = %chain,
                        quote_token = %quote_token,
                        "No native/quote reference pool, quote and USD gas costs will be zero"
                    );
                    QuoteConversion::Unavailable
                }
            }
        };

        info!(
            chain = %chain,
            gas_price = %gas_price,
            quote_token = %quote_token,
            usd_pool = %usd_pool,
            "Built gas model"
        );

        Ok(GasModel {
            chain,
            gas_price,
            quote_token: quote_token.clone(),
            estimator,
            usd_pool,
            usd_price,
            quote_conversion,
        })
    }

    async fn native_reference_pool<A, B>(
        &self,
        locator: &ReferencePoolLocator<'_>,
        concentrated_provider: &A,
        constant_product_provider: &B,
        quote_token: &Token,
    ) -> Result<Option<Pool>>
    where
        A: ConcentratedPoolProvider + ?Sized,
        B: ConstantProductPoolProvider + ?Sized,
    {
        if let Some(pool) = locator.native_pool(concentrated_provider, quote_token).await? {
            return Ok(Some(pool));
        }
        if !self.config.constant_product_quote_fallback {
            return Ok(None);
        }

        let pair = locator
            .native_pair(constant_product_provider, quote_token)
            .await?;
        debug!(
            quote_token = %quote_token,
            found = pair.is_some(),
            "Constant-product native/quote fallback"
        );
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConcentratedCosts, ConstantProductCosts, NetworkConfig};
    use num_bigint::BigUint;
    use qenus_pools::{Address, FeeTier, InMemoryPoolProvider, Route, TokenInfo};
    use std::collections::HashMap;

    const GAS_PRICE: u64 = 1_000;

    fn weth() -> Token {
        Token::new(Chain::Ethereum, Address::with_last_byte(0x10), "WETH", 18)
    }

    fn usdc() -> Token {
        Token::new(Chain::Ethereum, Address::with_last_byte(0x20), "USDC", 6)
    }

    fn uni() -> Token {
        Token::new(Chain::Ethereum, Address::with_last_byte(0x40), "UNI", 18)
    }

    fn low_address_token() -> Token {
        Token::new(Chain::Ethereum, Address::with_last_byte(0x05), "AAA", 18)
    }

    fn config(fallback: bool) -> GasModelConfig {
        let mut networks = HashMap::new();
        networks.insert(
            Chain::Ethereum,
            NetworkConfig {
                wrapped_native: TokenInfo::from(&weth()),
                usd_tokens: vec![TokenInfo::from(&usdc())],
                concentrated: ConcentratedCosts {
                    base_swap_cost: 100,
                    cost_per_hop: 50,
                    cost_per_init_tick: 10,
                    cost_per_uninit_tick: 0,
                },
                constant_product: ConstantProductCosts {
                    base_swap_cost: 80,
                    cost_per_extra_hop: 20,
                },
            },
        );
        GasModelConfig {
            networks,
            constant_product_quote_fallback: fallback,
            ..GasModelConfig::default()
        }
    }

    fn sqrt_x96(root: u64) -> U256 {
        U256::from(root) << 96
    }

    fn usd_pool() -> Pool {
        // WETH sorts first: 1 raw WETH = 4 raw USDC
        Pool::concentrated(weth(), usdc(), FeeTier::Medium, sqrt_x96(2), 1_000).unwrap()
    }

    fn provider_with_usd_pool() -> InMemoryPoolProvider {
        let provider = InMemoryPoolProvider::new();
        provider.insert(usd_pool());
        provider
    }

    /// One concentrated hop, no ticks crossed: 160 gas units
    fn single_hop_quote() -> RouteQuote {
        RouteQuote::without_ticks(Route::new(vec![usd_pool()]).unwrap())
    }

    async fn build(provider: &InMemoryPoolProvider, quote: &Token, fallback: bool) -> Result<GasModel> {
        GasModelFactory::new(config(fallback))
            .build_gas_model(Chain::Ethereum, U256::from(GAS_PRICE), provider, provider, quote)
            .await
    }

    #[tokio::test]
    async fn test_quote_in_native_is_native_cost() {
        let provider = provider_with_usd_pool();
        let model = build(&provider, &weth(), false).await.unwrap();
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();

        assert_eq!(estimate.gas_estimate, U256::from(160u32));
        assert_eq!(estimate.gas_cost_in_native.quotient(), BigUint::from(160_000u32));
        assert_eq!(estimate.gas_cost_in_quote_token, estimate.gas_cost_in_native);
        assert_eq!(estimate.gas_cost_in_usd.token(), &usdc());
        assert_eq!(estimate.gas_cost_in_usd.quotient(), BigUint::from(640_000u32));

        // the native/quote lookup is skipped
        assert_eq!(provider.query_count(), 1);
        assert!(model.native_pool().is_none());
    }

    #[tokio::test]
    async fn test_quote_through_native_pool() {
        let provider = provider_with_usd_pool();
        provider.insert(Pool::concentrated(weth(), uni(), FeeTier::High, sqrt_x96(3), 50).unwrap());

        let model = build(&provider, &uni(), false).await.unwrap();
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();

        assert_eq!(estimate.gas_cost_in_quote_token.token(), &uni());
        assert_eq!(estimate.gas_cost_in_quote_token.quotient(), BigUint::from(1_440_000u32));
        assert_eq!(estimate.gas_cost_in_usd.quotient(), BigUint::from(640_000u32));
        assert_eq!(provider.query_count(), 2);
        assert!(model.native_pool().is_some());
    }

    #[tokio::test]
    async fn test_native_pool_price_is_oriented_with_native_base() {
        let provider = provider_with_usd_pool();
        // AAA sorts before WETH: 1 raw AAA = 4 raw WETH
        provider.insert(
            Pool::concentrated(low_address_token(), weth(), FeeTier::Low, sqrt_x96(2), 50).unwrap(),
        );

        let model = build(&provider, &low_address_token(), false).await.unwrap();
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();
        assert_eq!(estimate.gas_cost_in_quote_token.quotient(), BigUint::from(40_000u32));
    }

    #[tokio::test]
    async fn test_missing_native_pool_degrades_to_zero() {
        let provider = provider_with_usd_pool();
        let model = build(&provider, &uni(), false).await.unwrap();
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();

        assert_eq!(estimate.gas_estimate, U256::from(160u32));
        assert!(!estimate.gas_cost_in_native.is_zero());
        assert!(estimate.gas_cost_in_quote_token.is_zero());
        assert_eq!(estimate.gas_cost_in_quote_token.token(), &uni());
        assert!(estimate.gas_cost_in_usd.is_zero());
        assert_eq!(estimate.gas_cost_in_usd.token(), &usdc());
    }

    #[tokio::test]
    async fn test_constant_product_fallback() {
        let provider = provider_with_usd_pool();
        provider.insert(Pool::constant_product(weth(), uni(), 1_000, 3_000).unwrap());

        let degraded = build(&provider, &uni(), false).await.unwrap();
        assert!(degraded.native_pool().is_none());

        let model = build(&provider, &uni(), true).await.unwrap();
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();
        assert_eq!(estimate.gas_cost_in_quote_token.quotient(), BigUint::from(480_000u32));
    }

    #[tokio::test]
    async fn test_missing_usd_pool_fails_build() {
        let provider = InMemoryPoolProvider::new();
        let result = build(&provider, &weth(), false).await;
        assert!(matches!(result, Err(GasModelError::NoLiquidityPool { .. })));
    }

    #[tokio::test]
    async fn test_unconfigured_chain_fails_build() {
        let provider = provider_with_usd_pool();
        let quote = Token::new(Chain::Base, Address::with_last_byte(0x10), "WETH", 18);
        let result = GasModelFactory::new(config(false))
            .build_gas_model(Chain::Base, U256::from(GAS_PRICE), &provider, &provider, &quote)
            .await;
        assert!(matches!(result, Err(GasModelError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_quote_token_on_other_chain_fails_build() {
        let provider = provider_with_usd_pool();
        let quote = Token::new(Chain::Base, Address::with_last_byte(0x40), "UNI", 18);
        let result = build(&provider, &quote, false).await;
        assert!(matches!(result, Err(GasModelError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_misoriented_price_reports_currency_mismatch() {
        let provider = provider_with_usd_pool();
        let mut model = build(&provider, &weth(), false).await.unwrap();
        model.usd_price = model.usd_price.invert().unwrap();

        let err = model.estimate_gas_cost(&single_hop_quote()).unwrap_err();
        assert!(err.is_currency_mismatch());
        let message = err.to_string();
        assert!(message.contains("USDC"));
        assert!(message.contains("WETH"));
    }

    #[tokio::test]
    async fn test_estimate_many_prices_every_route() {
        let provider = provider_with_usd_pool();
        let model = build(&provider, &weth(), false).await.unwrap();
        let quotes = vec![single_hop_quote(), single_hop_quote()];

        let results = model.estimate_many(&quotes);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[tokio::test]
    async fn test_estimate_many_returns_failures_per_route() {
        let provider = provider_with_usd_pool();
        let mut model = build(&provider, &weth(), false).await.unwrap();
        model.usd_price = model.usd_price.invert().unwrap();

        let two_hops = RouteQuote::new(Route::new(vec![usd_pool(), usd_pool()]).unwrap(), vec![1, 2]).unwrap();
        let results = model.estimate_many(&[single_hop_quote(), two_hops, single_hop_quote()]);

        assert_eq!(results.len(), 3);
        for result in &results {
            match result {
                Err(e) => assert!(e.is_currency_mismatch()),
                Ok(_) => panic!("misoriented USD price must fail every route"),
            }
        }
        assert!(model.estimate_many(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_zero_sqrt_price_native_pool_degrades() {
        let provider = provider_with_usd_pool();
        // AAA is token0, so the native-based price inverts a zero price
        provider.insert(
            Pool::concentrated(low_address_token(), weth(), FeeTier::High, U256::ZERO, 50).unwrap(),
        );

        let model = build(&provider, &low_address_token(), false).await.unwrap();
        assert!(model.native_pool().is_none());

        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();
        assert_eq!(estimate.gas_estimate, U256::from(160u32));
        assert!(estimate.gas_cost_in_quote_token.is_zero());
        assert!(estimate.gas_cost_in_usd.is_zero());
    }

    #[tokio::test]
    async fn test_zero_price_native_pool_degrades() {
        let provider = provider_with_usd_pool();
        // WETH is token0, so the price exists but is zero
        provider.insert(Pool::concentrated(weth(), uni(), FeeTier::High, U256::ZERO, 50).unwrap());

        let model = build(&provider, &uni(), false).await.unwrap();
        assert!(model.native_pool().is_none());
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();
        assert!(estimate.gas_cost_in_quote_token.is_zero());
    }

    #[tokio::test]
    async fn test_empty_fallback_pair_degrades() {
        let provider = provider_with_usd_pool();
        provider.insert(Pool::constant_product(low_address_token(), weth(), 0, 0).unwrap());

        let model = build(&provider, &low_address_token(), true).await.unwrap();
        assert!(model.native_pool().is_none());
        assert_eq!(model.usd_token(), &usdc());

        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();
        assert!(!estimate.gas_cost_in_native.is_zero());
        assert!(estimate.gas_cost_in_quote_token.is_zero());
        assert_eq!(estimate.gas_cost_in_quote_token.token(), &low_address_token());
    }

    #[tokio::test]
    async fn test_adjust_quote() {
        let provider = provider_with_usd_pool();
        let model = build(&provider, &weth(), false).await.unwrap();
        let estimate = model.estimate_gas_cost(&single_hop_quote()).unwrap();

        let quote = CurrencyAmount::from_raw(weth(), 1_000_000u32);
        let exact_in = estimate.adjust_quote(&quote, TradeType::ExactIn).unwrap();
        let exact_out = estimate.adjust_quote(&quote, TradeType::ExactOut).unwrap();
        assert_eq!(exact_in.quotient(), BigUint::from(840_000u32));
        assert_eq!(exact_out.quotient(), BigUint::from(1_160_000u32));

        let small = CurrencyAmount::from_raw(weth(), 10u32);
        assert!(estimate.adjust_quote(&small, TradeType::ExactIn).unwrap().is_zero());

        let wrong_token = CurrencyAmount::from_raw(usdc(), 10u32);
        assert!(estimate.adjust_quote(&wrong_token, TradeType::ExactIn).is_err());
    }

    #[test]
    fn test_gas_model_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GasModel>();
    }
}
