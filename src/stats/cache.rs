//! Caches keyed by edge-set identity
//!
//! `StatisticsDb` maps an edge set to the statistics of the join of its
//! relations; entries may be replaced as estimates are refined.
//! `SizeEstimates` maps an edge set to a raw cost and is write-once per key.

use std::collections::HashMap;

use super::errors::{StatsError, StatsResult};
use super::statistics::Statistics;
use crate::hypergraph::EdgeSetKey;

#[derive(Debug, Clone, Default)]
pub struct StatisticsDb {
    entries: HashMap<EdgeSetKey, Statistics>,
}

impl StatisticsDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &EdgeSetKey) -> Option<&Statistics> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &EdgeSetKey) -> Option<&mut Statistics> {
        self.entries.get_mut(key)
    }

    /// Statistics for `key`, failing with HD_STATS_MISSING when absent
    pub fn stats(&self, key: &EdgeSetKey) -> StatsResult<&Statistics> {
        self.entries
            .get(key)
            .ok_or_else(|| StatsError::missing(format!("edge set {}", key)))
    }

    pub fn get_or_insert_with(&mut self, key: EdgeSetKey, make: impl FnOnce() -> Statistics) -> &mut Statistics {
        self.entries.entry(key).or_insert_with(make)
    }

    pub fn put(&mut self, key: EdgeSetKey, stats: Statistics) {
        self.entries.insert(key, stats);
    }

    pub fn contains(&self, key: &EdgeSetKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SizeEstimates {
    costs: HashMap<EdgeSetKey, u64>,
}

impl SizeEstimates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the cost of `key`; a second registration is an error
    pub fn put(&mut self, key: EdgeSetKey, cost: u64) -> StatsResult<()> {
        if self.costs.contains_key(&key) {
            return Err(StatsError::duplicate_estimate(format!("edge set {}", key)));
        }
        self.costs.insert(key, cost);
        Ok(())
    }

    pub fn cost(&self, key: &EdgeSetKey) -> StatsResult<u64> {
        self.costs
            .get(key)
            .copied()
            .ok_or_else(|| StatsError::missing(format!("edge set {}", key)))
    }

    pub fn contains(&self, key: &EdgeSetKey) -> bool {
        self.costs.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
