//! Arena-backed search tree
//!
//! Nodes live in a slot vector and refer to each other by `NodeId`; removed
//! subtrees return their slots to a free list. The tree tracks a cursor
//! (`current`) used by the recursive search: `make_child` descends,
//! `move_to_parent` and `discard_current` climb back.

use super::separator::SeparatorIterator;
use crate::eval::Cost;
use crate::hypergraph::{Decomp, EdgeSet, Hypergraph, Node, Vertex};

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Component this node decomposes; empty for nodes built from a `Decomp`
    pub graph: Hypergraph,
    /// Component vertices plus the parent bag
    pub ext: Vec<Vertex>,
    pub separators: Option<SeparatorIterator>,
    pub sep: EdgeSet,
    pub bag: Vec<Vertex>,
    /// Components left by removing the separator's vertices from `graph`
    pub comps: Vec<Hypergraph>,
    /// Cost of this node alone, filled by the evaluator
    pub cached_cost: Option<Cost>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl SearchNode {
    fn detached(bag: Vec<Vertex>, sep: EdgeSet) -> Self {
        Self {
            graph: Hypergraph::default(),
            ext: Vec::new(),
            separators: None,
            sep,
            bag,
            comps: Vec::new(),
            cached_cost: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Installs a separator candidate: new bag, fresh components, no cost yet
    pub fn set_separator(&mut self, sep: EdgeSet) {
        self.bag = crate::hypergraph::vertices::inter(&sep.vertices(), &self.ext);
        self.comps = self.graph.components(&sep.vertices());
        self.sep = sep;
        self.cached_cost = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchTree {
    slots: Vec<Option<SearchNode>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    current: Option<NodeId>,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn set_current(&mut self, id: Option<NodeId>) {
        self.current = id;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Panics on a freed or unknown id; ids handed out by the tree stay
    /// valid until their subtree is removed.
    pub fn node(&self, id: NodeId) -> &SearchNode {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("search node {} is not live", id),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("search node {} is not live", id),
        }
    }

    /// Creates a node for `graph` below the current node and makes it current
    pub fn make_child(&mut self, graph: Hypergraph, old_sep: &[Vertex], separators: SeparatorIterator) -> NodeId {
        let ext = crate::hypergraph::vertices::union(&graph.vertices(), old_sep);
        let node = SearchNode {
            graph,
            ext,
            separators: Some(separators),
            ..SearchNode::detached(Vec::new(), EdgeSet::empty())
        };
        let id = self.attach(node, self.current);
        self.current = Some(id);
        id
    }

    fn attach(&mut self, mut node: SearchNode, parent: Option<NodeId>) -> NodeId {
        node.parent = parent;
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        match parent {
            Some(p) => self.node_mut(p).children.push(id),
            None => self.root = Some(id),
        }
        id
    }

    pub fn move_to_parent(&mut self) {
        if let Some(id) = self.current {
            self.current = self.node(id).parent;
        }
    }

    /// Removes the current node and its subtree, then moves to its parent
    pub fn discard_current(&mut self) {
        if let Some(id) = self.current {
            let parent = self.node(id).parent;
            self.remove_subtree(id);
            self.current = parent;
        }
    }

    /// Detaches `id` from its parent and frees its whole subtree
    pub fn remove_subtree(&mut self, id: NodeId) {
        match self.node(id).parent {
            Some(p) => self.node_mut(p).children.retain(|c| *c != id),
            None => self.root = None,
        }
        self.free_subtree(id);
    }

    /// Frees every descendant of `id`
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut open = vec![id];
        while let Some(n) = open.pop() {
            if let Some(node) = self.slots[n].take() {
                open.extend(node.children);
                self.free.push(n);
            }
        }
    }

    /// Frees a single node, handing its children to `new_parent`.
    ///
    /// The node must already be unlinked from its own parent's child list.
    pub(crate) fn dissolve(&mut self, id: NodeId, new_parent: NodeId) {
        if let Some(node) = self.slots[id].take() {
            for child in &node.children {
                self.node_mut(*child).parent = Some(new_parent);
            }
            self.node_mut(new_parent).children.extend(node.children);
            self.free.push(id);
        }
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.node_mut(id).parent = None;
        self.root = Some(id);
    }

    /// Live nodes in depth-first preorder
    pub fn dfs(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut open: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = open.pop() {
            out.push(id);
            open.extend(self.node(id).children.iter().rev());
        }
        out
    }

    /// Builds a detached copy of `decomp`; nodes carry only bag and cover
    pub fn from_decomp(decomp: &Decomp) -> Self {
        let mut tree = Self::new();
        let mut open: Vec<(&Node, Option<NodeId>)> = vec![(&decomp.root, None)];
        while let Some((node, parent)) = open.pop() {
            let id = tree.attach(SearchNode::detached(node.bag.clone(), node.cover.clone()), parent);
            for child in node.children.iter().rev() {
                open.push((child, Some(id)));
            }
        }
        tree.current = tree.root;
        tree
    }

    /// The finished decomposition rooted at the tree's root
    pub fn to_decomp(&self, graph: &Hypergraph) -> Option<Decomp> {
        let root = self.root?;
        Some(Decomp::new(graph.clone(), self.to_node(root)))
    }

    fn to_node(&self, id: NodeId) -> Node {
        let n = self.node(id);
        Node::new(n.bag.clone(), n.sep.clone())
            .with_children(n.children.iter().map(|c| self.to_node(*c)).collect())
    }
}
