//! Batched pool lookup
//!
//! The gas model never talks to a chain directly. It asks a provider for a
//! whole candidate set in one call and reads the answers back through a
//! [`PoolAccessor`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::{FeeTier, Pool, PoolKey, PoolSnapshot, Result, Token};

/// Trait for fetching concentrated-liquidity pools
#[async_trait]
pub trait ConcentratedPoolProvider: Send + Sync {
    /// Resolve every `(token_a, token_b, fee)` triple in a single round trip
    async fn get_pools(&self, candidates: &[(Token, Token, FeeTier)]) -> Result<PoolAccessor>;
}

/// Trait for fetching constant-product pairs
#[async_trait]
pub trait ConstantProductPoolProvider: Send + Sync {
    /// Resolve every `(token_a, token_b)` pair in a single round trip
    async fn get_pairs(&self, candidates: &[(Token, Token)]) -> Result<PoolAccessor>;
}

/// Answers to a batched lookup. Missing keys mean the pool does not exist.
#[derive(Debug, Clone, Default)]
pub struct PoolAccessor {
    pools: HashMap<PoolKey, Pool>,
}

impl PoolAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pool: Pool) {
        self.pools.insert(pool.key(), pool);
    }

    pub fn get_concentrated(&self, token_a: &Token, token_b: &Token, fee: FeeTier) -> Option<&Pool> {
        self.pools.get(&PoolKey::concentrated(token_a, token_b, fee))
    }

    pub fn get_pair(&self, token_a: &Token, token_b: &Token) -> Option<&Pool> {
        self.pools.get(&PoolKey::constant_product(token_a, token_b))
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl FromIterator<Pool> for PoolAccessor {
    fn from_iter<I: IntoIterator<Item = Pool>>(iter: I) -> Self {
        let mut accessor = PoolAccessor::new();
        for pool in iter {
            accessor.insert(pool);
        }
        accessor
    }
}

/// Provider serving pools from memory, e.g. a snapshot taken off-line
#[derive(Debug, Default)]
pub struct InMemoryPoolProvider {
    pools: RwLock<HashMap<PoolKey, Pool>>,
    queries: AtomicUsize,
}

impl InMemoryPoolProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider holding every pool of a snapshot
    pub fn from_snapshot(snapshot: &PoolSnapshot) -> Result<Self> {
        let provider = Self::new();
        for pool in snapshot.to_pools()? {
            provider.insert(pool);
        }
        Ok(provider)
    }

    /// Add or replace a pool
    pub fn insert(&self, pool: Pool) {
        self.pools.write().insert(pool.key(), pool);
    }

    pub fn remove(&self, key: &PoolKey) -> Option<Pool> {
        self.pools.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.read().is_empty()
    }

    /// Number of batched lookups served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    fn lookup<I>(&self, keys: I) -> PoolAccessor
    where
        I: IntoIterator<Item = PoolKey>,
    {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let pools = self.pools.read();
        let accessor: PoolAccessor = keys
            .into_iter()
            .filter_map(|key| pools.get(&key).cloned())
            .collect();
        debug!(found = accessor.len(), "Served batched pool lookup from memory");
        accessor
    }
}

#[async_trait]
impl ConcentratedPoolProvider for InMemoryPoolProvider {
    async fn get_pools(&self, candidates: &[(Token, Token, FeeTier)]) -> Result<PoolAccessor> {
        Ok(self.lookup(
            candidates
                .iter()
                .map(|(a, b, fee)| PoolKey::concentrated(a, b, *fee)),
        ))
    }
}

#[async_trait]
impl ConstantProductPoolProvider for InMemoryPoolProvider {
    async fn get_pairs(&self, candidates: &[(Token, Token)]) -> Result<PoolAccessor> {
        Ok(self.lookup(
            candidates
                .iter()
                .map(|(a, b)| PoolKey::constant_product(a, b)),
        ))
    }
}
