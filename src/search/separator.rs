//! Candidate separators for one search node
//!
//! For a node deciding how to split component `H` below a parent bag
//! `old_sep`, the candidates are:
//!
//! 1. every cover (at most `k` edges of the whole graph touching
//!    `conn = old_sep ∩ V(H)`) whose vertices reach into `V(H) \ old_sep`;
//! 2. for a cover that does not reach into `V(H) \ old_sep` and has room
//!    left, that cover extended by each edge of `H` in turn.
//!
//! Candidates are produced lazily and each distinct edge set at most once.

use std::collections::HashSet;

use super::errors::{SearchError, SearchResult};
use crate::hypergraph::{vertices, Cover, Edge, EdgeSet, EdgeSetKey, Hypergraph, Vertex};

#[derive(Debug, Clone)]
pub struct SeparatorIterator {
    k: usize,
    /// Edges of the component, used for the extension phase
    comp_edges: Vec<Edge>,
    comp_vertices: Vec<Vertex>,
    bound: Vec<Edge>,
    cover: Cover,
    /// Cover currently being extended, with the next edge index to add
    extending: Option<(EdgeSet, usize)>,
    seen: HashSet<EdgeSetKey>,
    next: Option<EdgeSet>,
}

impl SeparatorIterator {
    pub fn new(graph: &Hypergraph, comp: &Hypergraph, old_sep: &[Vertex], k: usize) -> Self {
        let comp_verts = comp.vertices();
        let conn = vertices::inter(old_sep, &comp_verts);
        let bound = graph.edges_touching(&conn);
        let cover = Cover::new(k, conn, &bound);

        let mut it = Self {
            k,
            comp_edges: comp.edges().to_vec(),
            comp_vertices: vertices::diff(&comp_verts, old_sep),
            bound,
            cover,
            extending: None,
            seen: HashSet::new(),
            next: None,
        };
        it.advance();
        it
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Returns the next candidate; calling this when `has_next` is false is an error
    pub fn next(&mut self) -> SearchResult<EdgeSet> {
        let out = self.next.take().ok_or_else(SearchError::iterator_exhausted)?;
        self.advance();
        Ok(out)
    }

    fn advance(&mut self) {
        while let Some(candidate) = self.produce() {
            if self.seen.insert(candidate.key()) {
                self.next = Some(candidate);
                return;
            }
        }
        self.next = None;
    }

    fn produce(&mut self) -> Option<EdgeSet> {
        loop {
            if let Some((base, i)) = self.extending.take() {
                if let Some(edge) = self.comp_edges.get(i) {
                    let candidate = base.with_edge(edge);
                    self.extending = Some((base, i + 1));
                    return Some(candidate);
                }
            }

            let subset = self.cover.next_subset()?;
            let sep = EdgeSet::new(subset.iter().map(|&i| self.bound[i].clone()));
            if vertices::intersects(&sep.vertices(), &self.comp_vertices) {
                return Some(sep);
            }
            // a full cover that misses the component yields nothing
            if sep.len() < self.k {
                self.extending = Some((sep, 0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::parse;

    fn keys(mut it: SeparatorIterator) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        while it.has_next() {
            out.push(it.next().unwrap().ids());
        }
        out
    }

    #[test]
    fn test_root_candidates_extend_the_empty_cover() {
        let g = parse("A(x,y), B(y,z), C(z,w).").unwrap().graph;
        let it = SeparatorIterator::new(&g, &g, &[], 1);
        assert_eq!(keys(it), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_covers_reaching_into_component_come_first() {
        let g = parse("A(x,y), B(y,z), C(z,w).").unwrap().graph;
        // component {C} below a bag {z}
        let comp = Hypergraph::new(vec![g.edges()[2].clone()]);
        let z = g.edges()[1].vertices[1];
        let it = SeparatorIterator::new(&g, &comp, &[z], 1);
        // B covers z but does not reach w; C does
        assert_eq!(keys(it), vec![vec![2]]);
    }

    #[test]
    fn test_candidates_are_not_repeated() {
        let g = parse("A(x,y), B(y,z), C(z,w).").unwrap().graph;
        let it = SeparatorIterator::new(&g, &g, &[], 2);
        let out = keys(it);
        let unique: HashSet<_> = out.iter().cloned().collect();
        assert_eq!(unique.len(), out.len());
        assert!(out.iter().all(|ids| !ids.is_empty() && ids.len() <= 2));
    }

    #[test]
    fn test_next_after_exhaustion_is_an_error() {
        let g = parse("A(x,y).").unwrap().graph;
        let mut it = SeparatorIterator::new(&g, &g, &[], 1);
        assert!(it.next().is_ok());
        assert!(!it.has_next());
        let err = it.next().unwrap_err();
        assert_eq!(err.code().code(), "HD_SEARCH_ITERATOR_EXHAUSTED");
    }
}
