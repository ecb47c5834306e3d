//! Swap routes and quoted routes

use crate::{Pool, PoolError, Result};

/// Ordered, non-empty chain of pools.
///
/// Consecutive pools are expected to share a token; that is the route
/// finder's job and is not checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pools: Vec<Pool>,
}

impl Route {
    pub fn new(pools: Vec<Pool>) -> Result<Self> {
        if pools.is_empty() {
            return Err(PoolError::invalid_route("route has no pools"));
        }
        Ok(Self { pools })
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Number of hops
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// A route together with the initialized ticks each hop crossed while quoting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteQuote {
    route: Route,
    initialized_ticks_crossed: Vec<u32>,
}

impl RouteQuote {
    /// `initialized_ticks_crossed` holds one entry per pool, constant-product
    /// hops included (they report 0).
    pub fn new(route: Route, initialized_ticks_crossed: Vec<u32>) -> Result<Self> {
        if initialized_ticks_crossed.len() != route.len() {
            return Err(PoolError::invalid_route(format!(
                "{} tick counts for {} pools",
                initialized_ticks_crossed.len(),
                route.len()
            )));
        }
        Ok(Self {
            route,
            initialized_ticks_crossed,
        })
    }

    /// Quote with no recorded tick crossings
    pub fn without_ticks(route: Route) -> Self {
        let initialized_ticks_crossed = vec![0; route.len()];
        Self {
            route,
            initialized_ticks_crossed,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn initialized_ticks_crossed(&self) -> &[u32] {
        &self.initialized_ticks_crossed
    }
}
