//! Exhaustive enumeration of width-bounded decompositions
//!
//! Depth-first search over separator candidates. After a decomposition is
//! found, `advance` backtracks like an odometer: the last node in preorder
//! tries its next candidate; when it has none left it is removed and the
//! node before it is tried. Once some node succeeds, every component that
//! lost its subtree on the way is decomposed again from scratch.

use std::sync::Arc;

use super::cancel::CancelToken;
use super::config::SearchConfig;
use super::errors::{SearchError, SearchResult};
use super::negative_cache::NegativeCache;
use super::separator::SeparatorIterator;
use super::streamer::{spawn_stream, DecompStream, Streamer};
use super::tree::{NodeId, SearchTree};
use crate::hypergraph::{Decomp, Hypergraph, Vertex};
use crate::observability::{log_event_with_fields, Event, SearchMetrics};

pub struct EnumSearch {
    graph: Hypergraph,
    width: usize,
    tree: SearchTree,
    negative: NegativeCache,
    metrics: Arc<SearchMetrics>,
    started: bool,
}

impl EnumSearch {
    pub fn new(graph: Hypergraph, config: &SearchConfig) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            width: config.width,
            tree: SearchTree::new(),
            negative: NegativeCache::new(config.negative_cache),
            metrics: Arc::new(SearchMetrics::new()),
            started: false,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<SearchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<SearchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Produces the next decomposition synchronously; `None` once exhausted
    pub fn next_decomp(&mut self) -> SearchResult<Option<Decomp>> {
        let found = if self.started {
            !self.tree.is_empty() && self.advance()?
        } else {
            self.started = true;
            self.tree.set_current(None);
            let graph = self.graph.clone();
            self.decompose(graph, &[])?
        };
        if !found {
            return Ok(None);
        }
        self.metrics.increment_decomps_emitted();
        Ok(self.tree.to_decomp(&self.graph))
    }

    /// Feeds decompositions to `sink` until exhaustion or until it refuses one
    pub(crate) fn run(&mut self, sink: &mut dyn FnMut(Decomp) -> bool) -> SearchResult<()> {
        while let Some(decomp) = self.next_decomp()? {
            if !sink(decomp) {
                break;
            }
        }
        Ok(())
    }

    /// Decomposes `comp` below the current node; keeps the new node on success
    fn decompose(&mut self, comp: Hypergraph, old_sep: &[Vertex]) -> SearchResult<bool> {
        let separators = SeparatorIterator::new(&self.graph, &comp, old_sep, self.width);
        let id = self.tree.make_child(comp, old_sep, separators);
        self.metrics.increment_nodes_created();

        let found = self.try_candidates(id)?;
        if found {
            self.tree.move_to_parent();
        } else {
            self.tree.discard_current();
        }
        Ok(found)
    }

    /// Tries the remaining candidates of `id` until one fully decomposes
    fn try_candidates(&mut self, id: NodeId) -> SearchResult<bool> {
        loop {
            let sep = match self.tree.node_mut(id).separators.as_mut() {
                Some(it) if it.has_next() => it.next()?,
                _ => return Ok(false),
            };
            self.metrics.increment_separators_tried();

            self.tree.clear_children(id);
            self.tree.node_mut(id).set_separator(sep);

            let node = self.tree.node(id);
            let (sep, bag, comps) = (node.sep.clone(), node.bag.clone(), node.comps.clone());
            if self.negative.check(&sep, &comps) {
                self.metrics.increment_negative_cache_hits();
                continue;
            }

            let mut solved = true;
            for comp in comps {
                self.tree.set_current(Some(id));
                if !self.decompose(comp.clone(), &bag)? {
                    if self.negative.add(&sep, &comp) {
                        self.metrics.increment_negative_cache_entries();
                    }
                    solved = false;
                    break;
                }
            }
            self.tree.set_current(Some(id));
            if solved {
                return Ok(true);
            }
        }
    }

    fn advance(&mut self) -> SearchResult<bool> {
        let mut order = self.tree.dfs();
        while let Some(id) = order.pop() {
            // everything after `id` in preorder is gone, so it is a leaf and
            // the last child of its parent
            self.tree.set_current(Some(id));
            if self.try_candidates(id)? {
                self.rebuild_ancestors(id)?;
                return Ok(true);
            }
            self.tree.remove_subtree(id);
        }
        Ok(false)
    }

    /// Re-decomposes the components each ancestor of `id` lost while backtracking
    fn rebuild_ancestors(&mut self, id: NodeId) -> SearchResult<()> {
        let mut child = id;
        while let Some(parent) = self.tree.node(child).parent {
            let node = self.tree.node(parent);
            let pending: Vec<Hypergraph> = node.comps[node.children.len()..].to_vec();
            let bag = node.bag.clone();

            for comp in pending {
                self.tree.set_current(Some(parent));
                if !self.decompose(comp, &bag)? {
                    return Err(SearchError::invariant_violated(
                        "a component decomposed before has no decomposition on retry",
                    ));
                }
            }
            child = parent;
        }
        Ok(())
    }
}

impl Streamer for EnumSearch {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn stream(self: Box<Self>, cancel: CancelToken) -> DecompStream {
        let mut search = *self;
        log_event_with_fields(
            Event::SearchBegin,
            &[("algorithm", "enum"), ("width", &search.width.to_string())],
        );
        spawn_stream("enum", cancel, move |sink| search.run(sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::parse;
    use std::collections::HashSet;

    fn all(text: &str, config: SearchConfig) -> (Hypergraph, Vec<Decomp>) {
        let g = parse(text).unwrap().graph;
        let mut search = EnumSearch::new(g.clone(), &config).unwrap();
        let mut out = Vec::new();
        while let Some(d) = search.next_decomp().unwrap() {
            out.push(d);
            assert!(out.len() < 10_000, "enumeration does not terminate");
        }
        (g, out)
    }

    #[test]
    fn test_path_has_width_one_decompositions() {
        let (g, decomps) = all("A(x,y), B(y,z), C(z,w).", SearchConfig::new(1));
        assert!(!decomps.is_empty());
        for d in &decomps {
            assert!(d.width() <= 1);
            assert!(d.is_correct(&g), "incorrect decomposition:\n{}", d);
        }
    }

    #[test]
    fn test_triangle_needs_width_two() {
        let (_, none) = all("A(x,y), B(y,z), C(z,x).", SearchConfig::new(1));
        assert!(none.is_empty());

        let (g, some) = all("A(x,y), B(y,z), C(z,x).", SearchConfig::new(2));
        assert!(!some.is_empty());
        assert!(some.iter().all(|d| d.width() <= 2 && d.is_correct(&g)));
    }

    #[test]
    fn test_negative_cache_does_not_change_results() {
        let text = "A(a,b), B(b,c), C(c,d), D(d,a), E(a,c).";
        let (_, with) = all(text, SearchConfig::new(2));
        let (_, without) = all(text, SearchConfig::new(2).with_negative_cache(false));

        let render = |ds: &[Decomp]| ds.iter().map(|d| d.to_string()).collect::<Vec<_>>();
        assert_eq!(render(&with), render(&without));
    }

    #[test]
    fn test_no_duplicate_decompositions() {
        let (_, decomps) = all("A(x,y), B(y,z), C(z,w).", SearchConfig::new(2));
        let unique: HashSet<String> = decomps.iter().map(|d| d.to_string()).collect();
        assert_eq!(unique.len(), decomps.len());
    }

    #[test]
    fn test_exhausted_search_stays_exhausted() {
        let g = parse("A(x,y).").unwrap().graph;
        let mut search = EnumSearch::new(g, &SearchConfig::new(1)).unwrap();
        assert!(search.next_decomp().unwrap().is_some());
        assert!(search.next_decomp().unwrap().is_none());
        assert!(search.next_decomp().unwrap().is_none());
    }

    #[test]
    fn test_stream_delivers_every_decomposition() {
        let g = parse("A(x,y), B(y,z), C(z,w).").unwrap().graph;
        let search = EnumSearch::new(g.clone(), &SearchConfig::new(1)).unwrap();
        let expected = all("A(x,y), B(y,z), C(z,w).", SearchConfig::new(1)).1.len();

        let streamed: Vec<Decomp> = Box::new(search)
            .stream(CancelToken::new())
            .collect::<SearchResult<Vec<_>>>()
            .unwrap();
        assert_eq!(streamed.len(), expected);
    }

    #[test]
    fn test_zero_width_rejected() {
        let g = parse("A(x,y).").unwrap().graph;
        assert!(EnumSearch::new(g, &SearchConfig::new(0)).is_err());
    }
}
