//! Finished decompositions
//!
//! A `Decomp` is a plain tree of `(bag, cover)` nodes, detached from any
//! search state. It is what the search engines emit and what the shrink
//! passes, the evaluators and the Yannakakis evaluator consume.

use std::collections::HashMap;
use std::fmt;

use super::graph::{EdgeSet, Hypergraph};
use super::parser::Encoding;
use super::vertices::{self, Vertex};

/// One decomposition node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Sorted vertices covered by this node
    pub bag: Vec<Vertex>,
    pub cover: EdgeSet,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(bag: Vec<Vertex>, cover: EdgeSet) -> Self {
        let mut bag = bag;
        vertices::normalize(&mut bag);
        Self {
            bag,
            cover,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Maximum cover size in this subtree
    pub fn width(&self) -> usize {
        self.children
            .iter()
            .map(Node::width)
            .fold(self.cover.len(), usize::max)
    }

    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Node::size).sum::<usize>()
    }

    /// Nodes of this subtree in preorder
    pub fn preorder(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut open = vec![self];
        while let Some(n) = open.pop() {
            out.push(n);
            open.extend(n.children.iter().rev());
        }
        out
    }

    fn remove_vertices(&mut self, removed: &[Vertex]) {
        self.bag = vertices::diff(&self.bag, removed);
        self.cover = EdgeSet::new(self.cover.iter().map(|e| {
            let mut e = e.clone();
            e.vertices = vertices::diff(&e.vertices, removed);
            e
        }));
        for child in &mut self.children {
            child.remove_vertices(removed);
        }
    }
}

/// A decomposition of `graph`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomp {
    pub graph: Hypergraph,
    pub root: Node,
}

impl Decomp {
    pub fn new(graph: Hypergraph, root: Node) -> Self {
        Self { graph, root }
    }

    /// The one-node decomposition: every vertex in one bag, every edge in its cover
    pub fn trivial(graph: &Hypergraph) -> Self {
        Self {
            graph: graph.clone(),
            root: Node::new(graph.vertices(), graph.edge_set()),
        }
    }

    pub fn width(&self) -> usize {
        self.root.width()
    }

    /// Checks that this is a generalized hypertree decomposition of `graph`.
    ///
    /// Every edge lies inside some bag, every bag lies inside the vertices of
    /// its own cover, and for every vertex the nodes containing it form a
    /// connected subtree.
    pub fn is_correct(&self, graph: &Hypergraph) -> bool {
        let nodes = self.root.preorder();

        let covered = graph
            .edges()
            .iter()
            .all(|e| nodes.iter().any(|n| vertices::is_subset(&e.vertices, &n.bag)));
        if !covered {
            return false;
        }

        if nodes
            .iter()
            .any(|n| !vertices::is_subset(&n.bag, &n.cover.vertices()))
        {
            return false;
        }

        // a vertex's nodes are connected iff exactly one of them has a parent
        // that does not contain it
        let mut subtree_roots: HashMap<Vertex, usize> = HashMap::new();
        count_subtree_roots(&self.root, &[], &mut subtree_roots);
        subtree_roots.values().all(|&count| count == 1)
    }

    /// Drops `removed` from every bag and every cover edge
    pub fn remove_vertices(&mut self, removed: &[Vertex]) {
        let mut removed = removed.to_vec();
        vertices::normalize(&mut removed);
        self.root.remove_vertices(&removed);
    }

    /// Renders the decomposition in GML, one GML node per tree node
    pub fn to_gml(&self, encoding: &Encoding) -> String {
        let mut out = String::from("graph [\n  directed 0\n");
        let mut edges = Vec::new();
        let mut next_id = 0usize;
        gml_node(&self.root, encoding, &mut next_id, &mut out, &mut edges);
        for (source, target) in edges {
            out.push_str(&format!(
                "  edge [\n    source {}\n    target {}\n  ]\n",
                source, target
            ));
        }
        out.push_str("]\n");
        out
    }

    /// Human-readable indented tree using vertex and edge names
    pub fn render(&self, encoding: &Encoding) -> String {
        let mut out = String::new();
        render_node(&self.root, 0, &mut |n, depth| {
            let bag = encoding.vertex_names(&n.bag).join(", ");
            let cover: Vec<&str> = n.cover.iter().map(|e| encoding.edge_name(e.id)).collect();
            out.push_str(&format!(
                "{}Bag: {{{}}}, Cover: {{{}}}\n",
                "  ".repeat(depth),
                bag,
                cover.join(", ")
            ));
        });
        out
    }
}

impl fmt::Display for Decomp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        render_node(&self.root, 0, &mut |n, depth| {
            let bag: Vec<String> = n.bag.iter().map(|v| v.to_string()).collect();
            out.push_str(&format!(
                "{}Bag: {{{}}}, Cover: {}\n",
                "  ".repeat(depth),
                bag.join(","),
                n.cover
            ));
        });
        write!(f, "{}", out)
    }
}

fn count_subtree_roots(node: &Node, parent_bag: &[Vertex], counts: &mut HashMap<Vertex, usize>) {
    for v in &node.bag {
        if parent_bag.binary_search(v).is_err() {
            *counts.entry(*v).or_insert(0) += 1;
        }
    }
    for child in &node.children {
        count_subtree_roots(child, &node.bag, counts);
    }
}

fn render_node(node: &Node, depth: usize, emit: &mut impl FnMut(&Node, usize)) {
    emit(node, depth);
    for child in &node.children {
        render_node(child, depth + 1, emit);
    }
}

fn gml_node(
    node: &Node,
    encoding: &Encoding,
    next_id: &mut usize,
    out: &mut String,
    edges: &mut Vec<(usize, usize)>,
) -> usize {
    let id = *next_id;
    *next_id += 1;

    let cover: Vec<&str> = node.cover.iter().map(|e| encoding.edge_name(e.id)).collect();
    out.push_str(&format!(
        "  node [\n    id {}\n    label \"{{{}}} {{{}}}\"\n  ]\n",
        id,
        cover.join(", "),
        encoding.vertex_names(&node.bag).join(", ")
    ));

    for child in &node.children {
        let child_id = gml_node(child, encoding, next_id, out, edges);
        edges.push((id, child_id));
    }
    id
}
