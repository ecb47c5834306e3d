//! Splits a route into runs of consecutive same-family pools

use qenus_pools::{Pool, PoolFamily};

/// Maximal run of consecutive pools of one family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSegment<'a> {
    pub family: PoolFamily,
    pub pools: &'a [Pool],
}

impl RouteSegment<'_> {
    /// Number of hops in the run
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Partition `pools` into maximal same-family runs, in order.
///
/// Concatenating the returned slices gives back `pools`; adjacent runs always
/// differ in family.
pub fn partition_by_family(pools: &[Pool]) -> Vec<RouteSegment<'_>> {
    let mut segments = Vec::new();
    let Some(first) = pools.first() else {
        return segments;
    };

    let mut start = 0;
    let mut family = first.family();
    for (index, pool) in pools.iter().enumerate().skip(1) {
        if pool.family() != family {
            segments.push(RouteSegment {
                family,
                pools: &pools[start..index],
            });
            start = index;
            family = pool.family();
        }
    }
    segments.push(RouteSegment {
        family,
        pools: &pools[start..],
    });

    segments
}
