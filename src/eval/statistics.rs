//! Cost from a statistics cache
//!
//! Node cost is the join estimate over the single-edge statistics of the
//! cover, stored back into the cache under the cover's key so repeated
//! covers are estimated once. A tree edge costs the semijoin estimate of
//! the parent's statistics by the child's, memoised per (parent, child)
//! pair; the parent's cached statistics are never overwritten.

use std::collections::HashMap;

use super::{cached_node_cost, require_every_edge, Cost, Evaluator};
use crate::hypergraph::{EdgeSet, EdgeSetKey, Hypergraph};
use crate::search::{NodeId, SearchTree};
use crate::stats::{estimate_join, estimate_semijoin, MixedStatsPolicy, Statistics, StatisticsDb, StatsError, StatsResult};

#[derive(Debug, Clone)]
pub struct StatisticsEvaluator {
    stats: StatisticsDb,
    semijoins: HashMap<(EdgeSetKey, EdgeSetKey), Cost>,
    policy: MixedStatsPolicy,
}

impl StatisticsEvaluator {
    /// Fails with HD_STATS_MISSING if some single edge of `graph` has no statistics
    pub fn new(stats: StatisticsDb, graph: &Hypergraph, policy: MixedStatsPolicy) -> StatsResult<Self> {
        require_every_edge(graph, "statistics", |id| stats.contains(&EdgeSetKey::new([id])))?;
        Ok(Self {
            stats,
            semijoins: HashMap::new(),
            policy,
        })
    }

    pub fn statistics(&self) -> &StatisticsDb {
        &self.stats
    }

    /// Statistics of the join of `sep`, estimated and cached on first use
    fn join_stats(&mut self, sep: &EdgeSet) -> StatsResult<&Statistics> {
        let key = sep.key();
        if !self.stats.contains(&key) {
            let singles: Vec<EdgeSetKey> = sep.iter().map(|e| EdgeSetKey::new([e.id])).collect();
            let inputs = singles
                .iter()
                .map(|k| self.stats.stats(k))
                .collect::<StatsResult<Vec<&Statistics>>>()?;
            let joined = estimate_join(&inputs, self.policy)?;
            self.stats.put(key.clone(), joined);
        }
        self.stats.stats(&key)
    }
}

impl Evaluator for StatisticsEvaluator {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn eval_node(&mut self, tree: &mut SearchTree, id: NodeId) -> StatsResult<Cost> {
        cached_node_cost(tree, id, |sep| Ok(self.join_stats(sep)?.size()))
    }

    fn eval_edge(&mut self, tree: &mut SearchTree, parent: NodeId, child: NodeId) -> StatsResult<Cost> {
        self.eval_node(tree, parent)?;
        self.eval_node(tree, child)?;

        let parent_key = tree.node(parent).sep.key();
        let child_key = tree.node(child).sep.key();
        let memo = (parent_key, child_key);
        if let Some(cost) = self.semijoins.get(&memo) {
            return Ok(*cost);
        }

        let missing = || StatsError::missing("join statistics of a tree edge");
        let parent_stats = self.stats.get(&memo.0).ok_or_else(missing)?;
        let child_stats = self.stats.get(&memo.1).ok_or_else(missing)?;
        let cost = estimate_semijoin(parent_stats, child_stats, self.policy)?.size();
        self.semijoins.insert(memo, cost);
        Ok(cost)
    }
}
