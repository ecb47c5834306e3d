//! Shared fixtures for the integration tests

use qenus_pools::PoolSnapshot;

/// 30 gwei
pub const GAS_PRICE_WEI: u64 = 30_000_000_000;

/// Mainnet pools, listed with token0/token1 in address order.
///
/// Index 0..=2 are USD reference candidates, 3 is WETH/UNI, 4 and 5 are
/// constant-product pairs. One raw USDC unit is 499_969_600 wei (about
/// 2000 USDC per WETH); one WETH is 256 UNI.
pub const MAINNET_SNAPSHOT: &str = r#"{
    "chain": "ethereum",
    "tokens": [
        { "symbol": "WETH", "address": "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "decimals": 18 },
        { "symbol": "USDC", "address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "decimals": 6 },
        { "symbol": "USDT", "address": "0xdac17f958d2ee523a2206206994597c13d831ec7", "decimals": 6 },
        { "symbol": "DAI", "address": "0x6b175474e89094c44da98b954eedeac495271d0f", "decimals": 18 },
        { "symbol": "UNI", "address": "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984", "decimals": 18 },
        { "symbol": "LINK", "address": "0x514910771af9ca656af840dff83e8264ecf986ca", "decimals": 18 }
    ],
    "pools": [
        {
            "family": "concentrated",
            "token0": "USDC",
            "token1": "WETH",
            "fee": 500,
            "sqrt_price_x96": "1771541713818950588591642729512960",
            "liquidity": "2000000000000000000"
        },
        {
            "family": "concentrated",
            "token0": "USDC",
            "token1": "WETH",
            "fee": 3000,
            "sqrt_price_x96": "1771541713818950588591642729512960",
            "liquidity": "5000000000000000000"
        },
        {
            "family": "concentrated",
            "token0": "WETH",
            "token1": "USDT",
            "fee": 500,
            "sqrt_price_x96": "3543298860208601860176384",
            "liquidity": "5000000000000000000"
        },
        {
            "family": "concentrated",
            "token0": "UNI",
            "token1": "WETH",
            "fee": 3000,
            "sqrt_price_x96": "4951760157141521099596496896",
            "liquidity": "100000000000000000000"
        },
        {
            "family": "constant_product",
            "token0": "DAI",
            "token1": "USDC",
            "reserve0": "1000000000000000000000000",
            "reserve1": "1000000000000"
        },
        {
            "family": "constant_product",
            "token0": "UNI",
            "token1": "DAI",
            "reserve0": "100000000000000000000000",
            "reserve1": "800000000000000000000000"
        }
    ]
}"#;

pub fn mainnet_snapshot() -> PoolSnapshot {
    PoolSnapshot::from_json(MAINNET_SNAPSHOT).expect("fixture snapshot parses")
}
