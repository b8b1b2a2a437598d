//! Cost from the real relations
//!
//! Node cost is the histogram join estimate over the relations of the
//! node's cover, memoised per edge set. A tree edge between two single-edge
//! nodes costs the histogram semijoin estimate; otherwise the child's
//! selectivity is scaled onto the parent: `round(child · parent / ∏ child base sizes)`.

use std::collections::HashMap;

use super::{cached_node_cost, scaled_edge_cost, Cost, Evaluator};
use crate::db::Database;
use crate::hypergraph::{EdgeId, EdgeSet, EdgeSetKey, Encoding, Hypergraph};
use crate::search::{NodeId, SearchTree};
use crate::stats::{estimate_join, estimate_semijoin, MixedStatsPolicy, Statistics, StatsError, StatsResult};

#[derive(Debug, Clone)]
pub struct InformedEvaluator {
    /// Exact statistics of the relation behind each edge
    edge_stats: HashMap<EdgeId, Statistics>,
    /// Estimated join size per cover
    join_sizes: HashMap<EdgeSetKey, Cost>,
    policy: MixedStatsPolicy,
}

impl InformedEvaluator {
    /// Fails with HD_STATS_MISSING if some edge of `graph` has no relation in `db`
    pub fn new(db: &Database, graph: &Hypergraph, encoding: &Encoding, policy: MixedStatsPolicy) -> StatsResult<Self> {
        let tables = db.edge_tables(encoding);
        let mut edge_stats = HashMap::new();
        for (id, name) in &tables {
            if let Some(table) = db.get(name) {
                edge_stats.insert(*id, table.compute_statistics());
            }
        }
        if let Some(edge) = graph.edges().iter().find(|e| !edge_stats.contains_key(&e.id)) {
            return Err(StatsError::missing(format!(
                "relation '{}'",
                encoding.edge_name(edge.id)
            )));
        }
        Ok(Self {
            edge_stats,
            join_sizes: HashMap::new(),
            policy,
        })
    }

    fn stats_of(&self, sep: &EdgeSet) -> StatsResult<Vec<&Statistics>> {
        sep.iter()
            .map(|e| {
                self.edge_stats
                    .get(&e.id)
                    .ok_or_else(|| StatsError::missing(format!("relation for edge {}", e.id)))
            })
            .collect()
    }

    fn join_size(&mut self, sep: &EdgeSet) -> StatsResult<Cost> {
        let key = sep.key();
        if let Some(size) = self.join_sizes.get(&key) {
            return Ok(*size);
        }
        let size = {
            let inputs = self.stats_of(sep)?;
            estimate_join(&inputs, self.policy)?.size()
        };
        self.join_sizes.insert(key, size);
        Ok(size)
    }

    /// Number of distinct covers whose join size has been estimated
    pub fn cached_joins(&self) -> usize {
        self.join_sizes.len()
    }
}

impl Evaluator for InformedEvaluator {
    fn name(&self) -> &'static str {
        "informed"
    }

    fn eval_node(&mut self, tree: &mut SearchTree, id: NodeId) -> StatsResult<Cost> {
        cached_node_cost(tree, id, |sep| self.join_size(sep))
    }

    fn eval_edge(&mut self, tree: &mut SearchTree, parent: NodeId, child: NodeId) -> StatsResult<Cost> {
        let parent_size = self.eval_node(tree, parent)?;
        let child_size = self.eval_node(tree, child)?;
        if parent_size == 0 || child_size == 0 {
            return Ok(0);
        }

        let parent_inputs = self.stats_of(&tree.node(parent).sep)?;
        let child_inputs = self.stats_of(&tree.node(child).sep)?;
        if parent_inputs.len() == 1 && child_inputs.len() == 1 {
            return Ok(estimate_semijoin(parent_inputs[0], child_inputs[0], self.policy)?.size());
        }

        let base: f64 = child_inputs.iter().map(|s| s.size() as f64).product();
        Ok(scaled_edge_cost(child_size, parent_size, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::read_database;
    use crate::hypergraph::{parse, Decomp, Node};

    const DB: &str = "\
r,R,A,B
t,1,x
t,1,y
t,2,x
t,2,y
t,2,z
r,S,A,C
t,1,p
t,1,q
t,1,r
t,1,s
t,1,t
t,2,u
";

    fn setup() -> (Hypergraph, InformedEvaluator) {
        let parsed = parse("R(A,B), S(A,C).").unwrap();
        let db = read_database(DB.as_bytes()).unwrap();
        let ev = InformedEvaluator::new(&db, &parsed.graph, &parsed.encoding, MixedStatsPolicy::Reject).unwrap();
        (parsed.graph, ev)
    }

    #[test]
    fn test_trivial_costs_histogram_join() {
        let (g, mut ev) = setup();
        // A=1: 2·5, A=2: 3·1
        assert_eq!(ev.eval(&Decomp::trivial(&g)).unwrap(), 13);
    }

    #[test]
    fn test_single_edge_nodes_use_semijoin() {
        let (g, mut ev) = setup();
        let child = Node::new(vec![0, 2], g.select(&[1]).unwrap());
        let root = Node::new(vec![0, 1], g.select(&[0]).unwrap()).with_children(vec![child]);
        // 5 + 6 + every R tuple has a partner in S
        assert_eq!(ev.eval(&Decomp::new(g, root)).unwrap(), 16);
    }

    #[test]
    fn test_join_sizes_memoised_per_cover() {
        let (g, mut ev) = setup();
        let trivial = Decomp::trivial(&g);
        ev.eval(&trivial).unwrap();
        ev.eval(&trivial).unwrap();
        assert_eq!(ev.cached_joins(), 1);

        let child = Node::new(vec![0, 2], g.select(&[1]).unwrap());
        let root = Node::new(vec![0, 1], g.select(&[0]).unwrap()).with_children(vec![child]);
        let split = Decomp::new(g, root);
        assert_eq!(ev.eval(&split).unwrap(), 16);
        assert_eq!(ev.cached_joins(), 3);
        assert_eq!(ev.eval(&split).unwrap(), 16);
        assert_eq!(ev.eval(&trivial).unwrap(), 13);
        assert_eq!(ev.cached_joins(), 3);
    }

    #[test]
    fn test_missing_relation_detected_up_front() {
        let parsed = parse("R(A,B), S(A,C), T(C).").unwrap();
        let db = read_database(DB.as_bytes()).unwrap();
        let err = InformedEvaluator::new(&db, &parsed.graph, &parsed.encoding, MixedStatsPolicy::Reject)
            .unwrap_err();
        assert!(err.message().contains("'T'"));
    }
}
