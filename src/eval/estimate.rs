//! Cost from precomputed size estimates
//!
//! Node cost is looked up per edge combination; a tree edge costs
//! `round(child · parent / ∏ single-edge estimates of the child)`.

use super::{cached_node_cost, require_every_edge, scaled_edge_cost, Cost, Evaluator};
use crate::hypergraph::{EdgeSetKey, Hypergraph};
use crate::search::{NodeId, SearchTree};
use crate::stats::{SizeEstimates, StatsResult};

#[derive(Debug, Clone)]
pub struct EstimateEvaluator {
    sizes: SizeEstimates,
}

impl EstimateEvaluator {
    /// Fails with HD_STATS_MISSING if some single edge of `graph` has no estimate
    pub fn new(sizes: SizeEstimates, graph: &Hypergraph) -> StatsResult<Self> {
        require_every_edge(graph, "size estimate", |id| sizes.contains(&EdgeSetKey::new([id])))?;
        Ok(Self { sizes })
    }
}

impl Evaluator for EstimateEvaluator {
    fn name(&self) -> &'static str {
        "estimate"
    }

    fn eval_node(&mut self, tree: &mut SearchTree, id: NodeId) -> StatsResult<Cost> {
        let sizes = &self.sizes;
        cached_node_cost(tree, id, |sep| sizes.cost(&sep.key()))
    }

    fn eval_edge(&mut self, tree: &mut SearchTree, parent: NodeId, child: NodeId) -> StatsResult<Cost> {
        let parent_size = self.eval_node(tree, parent)?;
        let child_size = self.eval_node(tree, child)?;
        if parent_size == 0 || child_size == 0 {
            return Ok(0);
        }

        let mut base = 1.0;
        for edge in tree.node(child).sep.iter() {
            base *= self.sizes.cost(&EdgeSetKey::new([edge.id]))? as f64;
        }
        Ok(scaled_edge_cost(child_size, parent_size, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::{parse, Decomp, Node};
    use crate::stats::read_estimates;

    fn setup(rows: &str) -> (Hypergraph, StatsResult<EstimateEvaluator>) {
        let parsed = parse("A(x,y), B(y,z), C(z,w).").unwrap();
        let sizes = read_estimates(rows.as_bytes(), &parsed.graph, &parsed.encoding).unwrap();
        let ev = EstimateEvaluator::new(sizes, &parsed.graph);
        (parsed.graph, ev)
    }

    #[test]
    fn test_chain_cost() {
        let (g, ev) = setup("A,10\nB,20\nC,40\nA,B,50\n");
        let mut ev = ev.unwrap();

        let c = Node::new(vec![2, 3], g.select(&[2]).unwrap());
        let root = Node::new(vec![0, 1, 2], g.select(&[0, 1]).unwrap()).with_children(vec![c]);
        // 50 + 40 + round(40 · 50 / 40)
        assert_eq!(ev.eval(&Decomp::new(g, root)).unwrap(), 140);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let (g, ev) = setup("A,10\nB,20\nC,40\nA,B,50\n");
        let mut ev = ev.unwrap();
        let c = Node::new(vec![2, 3], g.select(&[2]).unwrap());
        let root = Node::new(vec![0, 1, 2], g.select(&[0, 1]).unwrap()).with_children(vec![c]);
        let decomp = Decomp::new(g, root);
        assert_eq!(ev.eval(&decomp).unwrap(), ev.eval(&decomp).unwrap());
    }

    #[test]
    fn test_missing_combination_is_fatal() {
        let (g, ev) = setup("A,10\nB,20\nC,40\n");
        let mut ev = ev.unwrap();
        let err = ev.eval(&Decomp::trivial(&g)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_single_edge_detected_up_front() {
        let (_, ev) = setup("A,10\nB,20\n");
        assert!(ev.is_err());
    }
}
