//! Decomposition cost functions
//!
//! The cost of a decomposition is the sum over its nodes of the estimated
//! size of the node's join, plus for every tree edge the estimated size of
//! the semijoin between parent and child. Three interchangeable evaluators
//! differ only in where their estimates come from:
//!
//! - `InformedEvaluator`: statistics computed from a loaded database
//! - `EstimateEvaluator`: precomputed sizes per edge combination
//! - `StatisticsEvaluator`: a `StatisticsDb` extended lazily by the join
//!   and semijoin estimators
//!
//! Costs are `u64` and accumulate with saturating addition.

mod estimate;
mod informed;
mod statistics;

pub use estimate::EstimateEvaluator;
pub use informed::InformedEvaluator;
pub use statistics::StatisticsEvaluator;

use crate::hypergraph::{Decomp, EdgeSet, Hypergraph};
use crate::search::{NodeId, SearchTree};
use crate::stats::{StatsError, StatsResult};

pub type Cost = u64;

pub trait Evaluator: Send {
    fn name(&self) -> &'static str;

    /// Total cost of a finished decomposition
    fn eval(&mut self, decomp: &Decomp) -> StatsResult<Cost> {
        let mut tree = SearchTree::from_decomp(decomp);
        self.eval_tree(&mut tree)
    }

    /// Total cost of every node and tree edge reachable from the root
    fn eval_tree(&mut self, tree: &mut SearchTree) -> StatsResult<Cost> {
        let mut cost: Cost = 0;
        for id in tree.dfs() {
            cost = cost.saturating_add(self.eval_node(tree, id)?);
            let children = tree.node(id).children.clone();
            for child in children {
                cost = cost.saturating_add(self.eval_edge(tree, id, child)?);
            }
        }
        Ok(cost)
    }

    /// Estimated size of the join of the node's cover; cached on the node
    fn eval_node(&mut self, tree: &mut SearchTree, id: NodeId) -> StatsResult<Cost>;

    /// Estimated size of reducing the parent by the child
    fn eval_edge(&mut self, tree: &mut SearchTree, parent: NodeId, child: NodeId) -> StatsResult<Cost>;
}

/// Returns the node's cached cost, computing and storing it with `compute` on a miss
pub(crate) fn cached_node_cost(
    tree: &mut SearchTree,
    id: NodeId,
    compute: impl FnOnce(&EdgeSet) -> StatsResult<Cost>,
) -> StatsResult<Cost> {
    if let Some(cost) = tree.node(id).cached_cost {
        return Ok(cost);
    }
    let cost = compute(&tree.node(id).sep)?;
    tree.node_mut(id).cached_cost = Some(cost);
    Ok(cost)
}

/// `round(child · parent / denominator)`, zero when the denominator is zero
pub(crate) fn scaled_edge_cost(child: Cost, parent: Cost, denominator: f64) -> Cost {
    if denominator <= 0.0 {
        return 0;
    }
    (child as f64 * parent as f64 / denominator).round() as Cost
}

/// Fails with HD_STATS_MISSING unless `has` holds for every edge of `graph`
pub(crate) fn require_every_edge(
    graph: &Hypergraph,
    what: &str,
    mut has: impl FnMut(usize) -> bool,
) -> StatsResult<()> {
    for edge in graph.edges() {
        if !has(edge.id) {
            return Err(StatsError::missing(format!("{} for edge {}", what, edge.id)));
        }
    }
    Ok(())
}
