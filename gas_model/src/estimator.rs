//! Gas unit estimation for mixed routes

use alloy_primitives::U256;
use qenus_pools::amount::u256_to_biguint;
use qenus_pools::{Chain, CurrencyAmount, PoolFamily, RouteQuote, Token};
use tracing::debug;

use crate::config::NetworkConfig;
use crate::segmenter::partition_by_family;

/// Gas units of one route and their cost in the wrapped native token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGasEstimate {
    pub gas_units: U256,
    pub native_cost: CurrencyAmount,
}

/// Initialized ticks billed for a route; never less than one
pub fn total_initialized_ticks_crossed(ticks_crossed: &[u32]) -> u64 {
    ticks_crossed
        .iter()
        .map(|&ticks| u64::from(ticks))
        .sum::<u64>()
        .max(1)
}

/// Applies a chain's cost constants to quoted routes
#[derive(Debug, Clone)]
pub struct GasEstimator {
    network: NetworkConfig,
    wrapped_native: Token,
}

impl GasEstimator {
    pub fn new(chain: Chain, network: NetworkConfig) -> Self {
        let wrapped_native = network.wrapped_native_token(chain);
        Self {
            network,
            wrapped_native,
        }
    }

    pub fn wrapped_native(&self) -> &Token {
        &self.wrapped_native
    }

    /// Gas units for a route, before pricing
    pub fn gas_units(&self, quote: &RouteQuote) -> U256 {
        let concentrated = &self.network.concentrated;
        let constant_product = &self.network.constant_product;

        let mut gas_units = U256::ZERO;
        for segment in partition_by_family(quote.route().pools()) {
            let hops = U256::from(segment.len());
            gas_units += match segment.family {
                PoolFamily::Concentrated => {
                    U256::from(concentrated.base_swap_cost)
                        + U256::from(concentrated.cost_per_hop) * hops
                }
                PoolFamily::ConstantProduct => {
                    U256::from(constant_product.base_swap_cost)
                        + U256::from(constant_product.cost_per_extra_hop) * (hops - U256::from(1u8))
                }
            };
        }

        let ticks = total_initialized_ticks_crossed(quote.initialized_ticks_crossed());
        gas_units += U256::from(concentrated.cost_per_init_tick) * U256::from(ticks);
        // uninitialized ticks are not counted yet, so this term is always zero
        gas_units += U256::from(concentrated.cost_per_uninit_tick) * U256::ZERO;

        gas_units
    }

    /// Gas units and their native cost at `gas_price` wei per unit
    pub fn estimate(&self, quote: &RouteQuote, gas_price: U256) -> RouteGasEstimate {
        let gas_units = self.gas_units(quote);
        let native_raw = u256_to_biguint(gas_units) * u256_to_biguint(gas_price);

        debug!(
            hops = quote.route().len(),
            gas_units = %gas_units,
            gas_price = %gas_price,
            "Estimated route gas"
        );

        RouteGasEstimate {
            gas_units,
            native_cost: CurrencyAmount::from_raw(self.wrapped_native.clone(), native_raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConcentratedCosts, ConstantProductCosts};
    use num_bigint::BigUint;
    use proptest::prelude::*;
    use qenus_pools::{Address, FeeTier, Pool, Route, TokenInfo};

    fn synthetic_network() -> NetworkConfig {
        NetworkConfig {
            wrapped_native: TokenInfo::new("WETH", Address::with_last_byte(1), 18),
            usd_tokens: vec![TokenInfo::new("USDC", Address::with_last_byte(2), 6)],
            concentrated: ConcentratedCosts {
                base_swap_cost: 100,
                cost_per_hop: 50,
                cost_per_init_tick: 10,
                cost_per_uninit_tick: 7,
            },
            constant_product: ConstantProductCosts {
                base_swap_cost: 80,
                cost_per_extra_hop: 20,
            },
        }
    }

    fn pool(family: PoolFamily, salt: u8) -> Pool {
        let a = Token::new(Chain::Ethereum, Address::with_last_byte(salt), "A", 18);
        let b = Token::new(Chain::Ethereum, Address::with_last_byte(salt + 1), "B", 18);
        match family {
            PoolFamily::Concentrated => {
                Pool::concentrated(a, b, FeeTier::Medium, U256::from(1u8) << 96, 1).unwrap()
            }
            PoolFamily::ConstantProduct => Pool::constant_product(a, b, 1, 1).unwrap(),
        }
    }

    fn quote(families: &[PoolFamily], ticks: Vec<u32>) -> RouteQuote {
        let pools = families
            .iter()
            .enumerate()
            .map(|(i, f)| pool(*f, 10 + (i * 2) as u8))
            .collect();
        RouteQuote::new(Route::new(pools).unwrap(), ticks).unwrap()
    }

    fn estimator() -> GasEstimator {
        GasEstimator::new(Chain::Ethereum, synthetic_network())
    }

    #[test]
    fn test_mixed_route_scenario() {
        use PoolFamily::*;
        let quote = quote(
            &[Concentrated, Concentrated, ConstantProduct, ConstantProduct, ConstantProduct],
            vec![2, 1, 0, 0, 0],
        );
        // (100 + 50 * 2) + (80 + 20 * 2) + 10 * 3
        assert_eq!(estimator().gas_units(&quote), U256::from(350u32));
    }

    #[test]
    fn test_tick_floor_applies_to_zero_crossings() {
        let quote = quote(&[PoolFamily::Concentrated], vec![0]);
        // 100 + 50 + 10 * max(1, 0)
        assert_eq!(estimator().gas_units(&quote), U256::from(160u32));
    }

    #[test]
    fn test_single_constant_product_hop_has_no_extra_hop_cost() {
        let quote = quote(&[PoolFamily::ConstantProduct], vec![0]);
        assert_eq!(estimator().gas_units(&quote), U256::from(90u32));
    }

    #[test]
    fn test_split_runs_pay_base_cost_twice() {
        use PoolFamily::*;
        let quote = quote(&[ConstantProduct, Concentrated, ConstantProduct], vec![0, 0, 0]);
        // 80 + (100 + 50) + 80 + 10
        assert_eq!(estimator().gas_units(&quote), U256::from(320u32));
    }

    #[test]
    fn test_total_ticks_floor() {
        assert_eq!(total_initialized_ticks_crossed(&[]), 1);
        assert_eq!(total_initialized_ticks_crossed(&[0, 0, 0]), 1);
        assert_eq!(total_initialized_ticks_crossed(&[2, 1, 0]), 3);
        assert_eq!(total_initialized_ticks_crossed(&[u32::MAX, u32::MAX]), 2 * u32::MAX as u64);
    }

    #[test]
    fn test_native_cost_is_units_times_price() {
        let quote = quote(&[PoolFamily::Concentrated], vec![0]);
        let estimate = estimator().estimate(&quote, U256::from(30_000_000_000u64));

        assert_eq!(estimate.gas_units, U256::from(160u32));
        assert_eq!(estimate.native_cost.token().symbol, "WETH");
        assert_eq!(estimate.native_cost.quotient(), BigUint::from(4_800_000_000_000u64));
    }

    #[test]
    fn test_huge_gas_price_does_not_wrap() {
        let quote = quote(&[PoolFamily::Concentrated], vec![0]);
        let estimate = estimator().estimate(&quote, U256::MAX);
        assert_eq!(
            estimate.native_cost.quotient(),
            u256_to_biguint(U256::MAX) * BigUint::from(160u32)
        );
    }

    proptest! {
        #[test]
        fn prop_gas_grows_with_concentrated_hops(hops in 1usize..30) {
            let shorter = quote(&vec![PoolFamily::Concentrated; hops], vec![0; hops]);
            let longer = quote(&vec![PoolFamily::Concentrated; hops + 1], vec![0; hops + 1]);
            prop_assert!(estimator().gas_units(&longer) >= estimator().gas_units(&shorter));
        }

        #[test]
        fn prop_gas_grows_with_constant_product_hops(hops in 1usize..30) {
            let shorter = quote(&vec![PoolFamily::ConstantProduct; hops], vec![0; hops]);
            let longer = quote(&vec![PoolFamily::ConstantProduct; hops + 1], vec![0; hops + 1]);
            prop_assert!(estimator().gas_units(&longer) >= estimator().gas_units(&shorter));
        }
    }
}
