//! Hyperedges, edge sets and hypergraphs
//!
//! A `Hypergraph` is an ordered collection of edges; its vertex set is the
//! union of its edges. Components produced by `components` are themselves
//! hypergraphs holding the original (unprojected) edges.

use std::collections::HashMap;
use std::fmt;

use super::vertices::{self, Vertex};

/// Dense edge identifier assigned by the parser
pub type EdgeId = usize;

/// A named hyperedge (name resolved through the `Encoding`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub id: EdgeId,
    /// Sorted, duplicate-free
    pub vertices: Vec<Vertex>,
}

impl Edge {
    /// Creates an edge, normalizing its vertex list
    pub fn new(id: EdgeId, vertices: impl IntoIterator<Item = Vertex>) -> Self {
        let mut vertices: Vec<Vertex> = vertices.into_iter().collect();
        vertices::normalize(&mut vertices);
        Self { id, vertices }
    }
}

/// Order-independent identity of a set of edges.
///
/// Two edge sets with the same ids in any order, with or without
/// repetitions, produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeSetKey(Vec<EdgeId>);

impl EdgeSetKey {
    pub fn new(ids: impl IntoIterator<Item = EdgeId>) -> Self {
        let mut ids: Vec<EdgeId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn ids(&self) -> &[EdgeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EdgeSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.0.iter().map(|id| id.to_string()).collect();
        write!(f, "{{{}}}", ids.join(","))
    }
}

/// An unordered, deduplicated collection of edges (a separator or cover).
///
/// Stored sorted by edge id, so equality is order-independent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EdgeSet {
    edges: Vec<Edge>,
}

impl EdgeSet {
    pub fn new(edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut edges: Vec<Edge> = edges.into_iter().collect();
        edges.sort_by_key(|e| e.id);
        edges.dedup_by_key(|e| e.id);
        Self { edges }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    pub fn ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|e| e.id).collect()
    }

    pub fn contains(&self, id: EdgeId) -> bool {
        self.edges.binary_search_by_key(&id, |e| e.id).is_ok()
    }

    /// Union of the vertices of all edges
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out: Vec<Vertex> = self
            .edges
            .iter()
            .flat_map(|e| e.vertices.iter().copied())
            .collect();
        vertices::normalize(&mut out);
        out
    }

    /// A copy of this set with one more edge
    pub fn with_edge(&self, edge: &Edge) -> Self {
        Self::new(self.edges.iter().cloned().chain(std::iter::once(edge.clone())))
    }

    /// Union of two edge sets
    pub fn merged(&self, other: &EdgeSet) -> Self {
        Self::new(self.edges.iter().chain(other.edges.iter()).cloned())
    }

    /// True if every edge of `self` is in `other`
    pub fn is_subset_of(&self, other: &EdgeSet) -> bool {
        self.edges.iter().all(|e| other.contains(e.id))
    }

    pub fn key(&self) -> EdgeSetKey {
        EdgeSetKey::new(self.edges.iter().map(|e| e.id))
    }
}

impl fmt::Display for EdgeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A hypergraph: an ordered list of edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hypergraph {
    edges: Vec<Edge>,
}

impl Hypergraph {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Looks up an edge by id
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Sorted union of all edge vertices
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out: Vec<Vertex> = self
            .edges
            .iter()
            .flat_map(|e| e.vertices.iter().copied())
            .collect();
        vertices::normalize(&mut out);
        out
    }

    /// All edges as an edge set
    pub fn edge_set(&self) -> EdgeSet {
        EdgeSet::new(self.edges.iter().cloned())
    }

    pub fn key(&self) -> EdgeSetKey {
        EdgeSetKey::new(self.edges.iter().map(|e| e.id))
    }

    /// Edges sharing at least one vertex with `vertices`, in graph order
    pub fn edges_touching(&self, vertices: &[Vertex]) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| vertices::intersects(&e.vertices, vertices))
            .cloned()
            .collect()
    }

    /// Resolves edge ids into an edge set; `None` if any id is unknown
    pub fn select(&self, ids: &[EdgeId]) -> Option<EdgeSet> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            out.push(self.edge(*id)?.clone());
        }
        Some(EdgeSet::new(out))
    }

    /// Splits the graph into connected components after removing `removed`.
    ///
    /// Edges entirely inside `removed` disappear. Two remaining edges are in
    /// the same component iff they are linked by a chain of shared vertices
    /// outside `removed`. Components are ordered by their first edge.
    pub fn components(&self, removed: &[Vertex]) -> Vec<Hypergraph> {
        let alive: Vec<usize> = (0..self.edges.len())
            .filter(|&i| !vertices::is_subset(&self.edges[i].vertices, removed))
            .collect();

        let mut parent: Vec<usize> = (0..self.edges.len()).collect();
        let mut owner: HashMap<Vertex, usize> = HashMap::new();

        for &i in &alive {
            for v in &self.edges[i].vertices {
                if removed.binary_search(v).is_ok() {
                    continue;
                }
                match owner.get(v) {
                    Some(&j) => union_roots(&mut parent, i, j),
                    None => {
                        owner.insert(*v, i);
                    }
                }
            }
        }

        let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<Edge>> = Vec::new();
        for &i in &alive {
            let root = find_root(&mut parent, i);
            let slot = *slot_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(self.edges[i].clone());
        }

        groups.into_iter().map(Hypergraph::new).collect()
    }

    /// Adds one fresh vertex to every edge so that any decomposition must
    /// cover each edge completely in a single bag. Returns the added vertices.
    pub fn make_edges_distinct(&mut self, first_fresh: Vertex) -> Vec<Vertex> {
        let mut added = Vec::with_capacity(self.edges.len());
        for (offset, edge) in self.edges.iter_mut().enumerate() {
            let fresh = first_fresh + offset;
            edge.vertices.push(fresh);
            vertices::normalize(&mut edge.vertices);
            added.push(fresh);
        }
        added
    }
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn union_roots(parent: &mut [usize], a: usize, b: usize) {
    let ra = find_root(parent, a);
    let rb = find_root(parent, b);
    if ra != rb {
        // keep the smaller index as root so component order follows edge order
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi] = lo;
    }
}
