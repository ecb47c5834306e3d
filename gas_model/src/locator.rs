//! Reference pool lookup
//!
//! Finds the pools used only to price gas: wrapped native against a USD
//! token, and wrapped native against the caller's quote token. Each lookup
//! is a single batched request; the deepest existing candidate wins.

use qenus_pools::{
    Chain, ConcentratedPoolProvider, ConstantProductPoolProvider, FeeTier, Pool, PoolAccessor, Token,
};
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::error::{GasModelError, Result};

/// Pick the pool with strictly greatest liquidity; ties go to the earliest candidate
pub fn select_highest_liquidity<'a, I>(candidates: I) -> Option<&'a Pool>
where
    I: IntoIterator<Item = &'a Pool>,
{
    candidates.into_iter().fold(None, |best, pool| match best {
        Some(current) if current.liquidity() >= pool.liquidity() => Some(current),
        _ => Some(pool),
    })
}

/// Locates reference pools for one chain
pub struct ReferencePoolLocator<'a> {
    chain: Chain,
    network: &'a NetworkConfig,
    usd_fee_tiers: &'a [FeeTier],
    quote_fee_tiers: &'a [FeeTier],
}

impl<'a> ReferencePoolLocator<'a> {
    pub fn new(
        chain: Chain,
        network: &'a NetworkConfig,
        usd_fee_tiers: &'a [FeeTier],
        quote_fee_tiers: &'a [FeeTier],
    ) -> Self {
        Self {
            chain,
            network,
            usd_fee_tiers,
            quote_fee_tiers,
        }
    }

    /// Candidate triples for the USD pool, fee tier major
    pub fn usd_candidates(&self) -> Result<Vec<(Token, Token, FeeTier)>> {
        let usd_tokens = self.network.usd_token_list(self.chain);
        if usd_tokens.is_empty() {
            return Err(GasModelError::configuration(format!(
                "no USD tokens configured for {}",
                self.chain
            )));
        }

        let native = self.network.wrapped_native_token(self.chain);
        Ok(self
            .usd_fee_tiers
            .iter()
            .flat_map(|fee| {
                usd_tokens
                    .iter()
                    .map(|usd| (native.clone(), usd.clone(), *fee))
                    .collect::<Vec<_>>()
            })
            .collect())
    }

    /// Candidate triples for the native/quote pool
    pub fn native_candidates(&self, quote_token: &Token) -> Vec<(Token, Token, FeeTier)> {
        let native = self.network.wrapped_native_token(self.chain);
        self.quote_fee_tiers
            .iter()
            .map(|fee| (native.clone(), quote_token.clone(), *fee))
            .collect()
    }

    /// Deepest wrapped-native/USD pool. Failing to find one is fatal.
    pub async fn usd_pool<P>(&self, provider: &P) -> Result<Pool>
    where
        P: ConcentratedPoolProvider + ?Sized,
    {
        let candidates = self.usd_candidates()?;
        let accessor = provider.get_pools(&candidates).await?;

        let pool = pick(&accessor, &candidates).ok_or_else(|| {
            GasModelError::no_liquidity_pool(
                self.chain,
                format!(
                    "no {}/USD pool among {} candidates",
                    self.network.wrapped_native.symbol,
                    candidates.len()
                ),
            )
        })?;

        info!(
            chain = %self.chain,
            pool = %pool,
            liquidity = pool.liquidity(),
            "Selected USD reference pool"
        );
        Ok(pool)
    }

    /// Deepest wrapped-native/quote pool, if any exists
    pub async fn native_pool<P>(&self, provider: &P, quote_token: &Token) -> Result<Option<Pool>>
    where
        P: ConcentratedPoolProvider + ?Sized,
    {
        let candidates = self.native_candidates(quote_token);
        let accessor = provider.get_pools(&candidates).await?;
        let pool = pick(&accessor, &candidates);

        match &pool {
            Some(pool) => debug!(
                chain = %self.chain,
                pool = %pool,
                liquidity = pool.liquidity(),
                "Selected native reference pool"
            ),
            None => debug!(
                chain = %self.chain,
                quote_token = %quote_token,
                "No concentrated native reference pool"
            ),
        }
        Ok(pool)
    }

    /// Constant-product wrapped-native/quote pair, if one exists
    pub async fn native_pair<P>(&self, provider: &P, quote_token: &Token) -> Result<Option<Pool>>
    where
        P: ConstantProductPoolProvider + ?Sized,
    {
        let native = self.network.wrapped_native_token(self.chain);
        let candidates = [(native.clone(), quote_token.clone())];
        let accessor = provider.get_pairs(&candidates).await?;
        Ok(accessor.get_pair(&native, quote_token).cloned())
    }
}

/// Existing candidates in candidate order, then the deepest of them
fn pick(accessor: &PoolAccessor, candidates: &[(Token, Token, FeeTier)]) -> Option<Pool> {
    let existing = candidates
        .iter()
        .filter_map(|(a, b, fee)| accessor.get_concentrated(a, b, *fee));
    select_highest_liquidity(existing).cloned()
}
