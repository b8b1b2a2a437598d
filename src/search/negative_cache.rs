//! Known-failing subproblems
//!
//! A subproblem is a component to decompose below a separator. Whether it
//! has a decomposition depends only on the separator's vertices inside the
//! component, so a failure recorded for (separator, component) holds for
//! every later occurrence of the same pair.

use std::collections::HashSet;

use crate::hypergraph::{EdgeSet, EdgeSetKey, Hypergraph};

#[derive(Debug, Clone, Default)]
pub struct NegativeCache {
    enabled: bool,
    failed: HashSet<(EdgeSetKey, EdgeSetKey)>,
}

impl NegativeCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            failed: HashSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records that `comp` has no decomposition below `sep`; returns true if new
    pub fn add(&mut self, sep: &EdgeSet, comp: &Hypergraph) -> bool {
        self.enabled && self.failed.insert((sep.key(), comp.key()))
    }

    /// True if any of `comps` is known to fail below `sep`
    pub fn check(&self, sep: &EdgeSet, comps: &[Hypergraph]) -> bool {
        if !self.enabled || self.failed.is_empty() {
            return false;
        }
        let sep = sep.key();
        comps
            .iter()
            .any(|c| self.failed.contains(&(sep.clone(), c.key())))
    }

    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }
}
