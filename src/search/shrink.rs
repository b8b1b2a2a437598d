//! Removal of redundant decomposition nodes
//!
//! A node is merged into a neighbour when its bag or cover is already
//! contained in the neighbour's:
//!
//! | bag ⊆ | cover ⊆ | soft                     | hard                         |
//! |-------|---------|--------------------------|------------------------------|
//! | yes   | yes     | drop the node            | drop the node                |
//! | no    | yes     | drop it, union the bags  | drop it, union the bags      |
//! | yes   | no      | keep                     | drop it, union the covers    |
//!
//! An upward pass merges nodes into their parents in preorder, then a
//! downward pass in reverse preorder merges a node into its first mergeable
//! child, which takes its place. Merging two adjacent nodes keeps the
//! decomposition valid; hard shrinking may increase its width.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::tree::{NodeId, SearchTree};
use crate::hypergraph::{vertices, Decomp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShrinkMode {
    Soft,
    Hard,
}

impl ShrinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShrinkMode::Soft => "soft",
            ShrinkMode::Hard => "hard",
        }
    }
}

impl fmt::Display for ShrinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShrinkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(ShrinkMode::Soft),
            "hard" => Ok(ShrinkMode::Hard),
            other => Err(format!("shrink mode must be 'soft' or 'hard', got '{}'", other)),
        }
    }
}

/// Returns a copy of `decomp` with redundant nodes merged away
pub fn shrink(decomp: &Decomp, mode: ShrinkMode) -> Decomp {
    let mut tree = SearchTree::from_decomp(decomp);

    for id in tree.dfs() {
        shrink_up(&mut tree, id, mode);
    }
    for id in tree.dfs().into_iter().rev() {
        shrink_down(&mut tree, id, mode);
    }

    tree.to_decomp(&decomp.graph).unwrap_or_else(|| decomp.clone())
}

fn shrink_up(tree: &mut SearchTree, id: NodeId, mode: ShrinkMode) {
    let Some(parent) = tree.node(id).parent else {
        return;
    };
    if simplify(tree, id, parent, mode) {
        tree.node_mut(parent).children.retain(|c| *c != id);
        tree.dissolve(id, parent);
    }
}

fn shrink_down(tree: &mut SearchTree, id: NodeId, mode: ShrinkMode) {
    let children = tree.node(id).children.clone();
    let Some(child) = children.into_iter().find(|c| simplify(tree, id, *c, mode)) else {
        return;
    };

    tree.node_mut(id).children.retain(|c| *c != child);
    let parent = tree.node(id).parent;
    if let Some(p) = parent {
        tree.node_mut(p).children.retain(|c| *c != id);
    }
    tree.dissolve(id, child);
    match parent {
        Some(p) => {
            tree.node_mut(child).parent = Some(p);
            tree.node_mut(p).children.push(child);
        }
        None => tree.set_root(child),
    }
}

/// Decides whether `from` can be merged into `into`; on success `into` absorbs what it needs
fn simplify(tree: &mut SearchTree, from: NodeId, into: NodeId, mode: ShrinkMode) -> bool {
    let (from_bag, from_sep) = {
        let n = tree.node(from);
        (n.bag.clone(), n.sep.clone())
    };
    let target = tree.node_mut(into);
    let bag_sub = vertices::is_subset(&from_bag, &target.bag);
    let cover_sub = from_sep.is_subset_of(&target.sep);

    match (bag_sub, cover_sub) {
        (true, true) => true,
        (true, false) => {
            if mode == ShrinkMode::Hard {
                target.sep = target.sep.merged(&from_sep);
                target.cached_cost = None;
            }
            mode == ShrinkMode::Hard
        }
        (false, true) => {
            target.bag = vertices::union(&target.bag, &from_bag);
            true
        }
        (false, false) => false,
    }
}
