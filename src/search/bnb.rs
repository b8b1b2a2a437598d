//! Branch-and-bound search for one cheaper decomposition
//!
//! The trivial one-node decomposition is emitted first and its cost becomes
//! the bound. The search then runs the same recursion as enumeration but
//! skips a candidate as soon as its node cost, or the running cost of the
//! node plus its solved components and tree edges, exceeds the bound. At
//! most one further decomposition is emitted; its tracked cost must match a
//! fresh evaluation of the finished tree.

use std::sync::Arc;

use super::cancel::CancelToken;
use super::config::SearchConfig;
use super::errors::{SearchError, SearchResult};
use super::separator::SeparatorIterator;
use super::streamer::{spawn_stream, DecompStream, Streamer};
use super::tree::SearchTree;
use crate::eval::{Cost, Evaluator};
use crate::hypergraph::{Decomp, Hypergraph, Vertex};
use crate::observability::{log_event_with_fields, Event, SearchMetrics};

pub struct BnbSearch {
    graph: Hypergraph,
    width: usize,
    tree: SearchTree,
    evaluator: Box<dyn Evaluator>,
    bound: Cost,
    metrics: Arc<SearchMetrics>,
}

impl BnbSearch {
    pub fn new(graph: Hypergraph, config: &SearchConfig, evaluator: Box<dyn Evaluator>) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            width: config.width,
            tree: SearchTree::new(),
            evaluator,
            bound: Cost::MAX,
            metrics: Arc::new(SearchMetrics::new()),
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<SearchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub(crate) fn run(&mut self, sink: &mut dyn FnMut(Decomp) -> bool) -> SearchResult<()> {
        let trivial = Decomp::trivial(&self.graph);
        self.bound = self.evaluator.eval(&trivial)?;
        log_event_with_fields(Event::BnbIncumbent, &[("cost", &self.bound.to_string())]);
        if !sink(trivial) {
            return Ok(());
        }

        self.tree = SearchTree::new();
        let graph = self.graph.clone();
        let Some(cost) = self.decompose(graph, &[])? else {
            return Ok(());
        };

        let decomp = self
            .tree
            .to_decomp(&self.graph)
            .ok_or_else(|| SearchError::invariant_violated("search succeeded without a root"))?;
        let recomputed = self.evaluator.eval(&decomp)?;
        if recomputed != cost {
            return Err(SearchError::cost_mismatch(recomputed, cost));
        }

        self.bound = cost;
        log_event_with_fields(Event::BnbImproved, &[("cost", &cost.to_string())]);
        self.metrics.increment_decomps_emitted();
        sink(decomp);
        Ok(())
    }

    /// Decomposes `comp` below the current node within the bound; returns the subtree cost
    fn decompose(&mut self, comp: Hypergraph, old_sep: &[Vertex]) -> SearchResult<Option<Cost>> {
        let separators = SeparatorIterator::new(&self.graph, &comp, old_sep, self.width);
        let id = self.tree.make_child(comp, old_sep, separators);
        self.metrics.increment_nodes_created();

        let mut result = None;
        loop {
            let sep = match self.tree.node_mut(id).separators.as_mut() {
                Some(it) if it.has_next() => it.next()?,
                _ => break,
            };
            self.metrics.increment_separators_tried();

            self.tree.clear_children(id);
            self.tree.node_mut(id).set_separator(sep);

            let node_cost = self.evaluator.eval_node(&mut self.tree, id)?;
            if node_cost > self.bound {
                self.metrics.increment_candidates_pruned();
                continue;
            }

            let node = self.tree.node(id);
            let (bag, comps) = (node.bag.clone(), node.comps.clone());
            let mut running = node_cost;
            let mut solved = true;
            for comp in comps {
                self.tree.set_current(Some(id));
                let Some(sub_cost) = self.decompose(comp, &bag)? else {
                    solved = false;
                    break;
                };
                let child = self
                    .tree
                    .node(id)
                    .children
                    .last()
                    .copied()
                    .ok_or_else(|| SearchError::invariant_violated("solved component left no child"))?;
                let edge_cost = self.evaluator.eval_edge(&mut self.tree, id, child)?;
                running = running.saturating_add(sub_cost).saturating_add(edge_cost);
                if running > self.bound {
                    self.metrics.increment_candidates_pruned();
                    solved = false;
                    break;
                }
            }
            self.tree.set_current(Some(id));
            if solved {
                result = Some(running);
                break;
            }
        }

        if result.is_some() {
            self.tree.move_to_parent();
        } else {
            self.tree.discard_current();
        }
        Ok(result)
    }
}

impl Streamer for BnbSearch {
    fn name(&self) -> &'static str {
        "bnb"
    }

    fn stream(self: Box<Self>, cancel: CancelToken) -> DecompStream {
        let mut search = *self;
        log_event_with_fields(
            Event::SearchBegin,
            &[
                ("algorithm", "bnb"),
                ("evaluator", search.evaluator.name()),
                ("width", &search.width.to_string()),
            ],
        );
        spawn_stream("bnb", cancel, move |sink| search.run(sink))
    }
}
