//! Search counters
//!
//! Monotonic counters shared between a search thread and its caller.
//! Relaxed atomics: values are exact once the search has finished.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct SearchMetrics {
    nodes_created: AtomicU64,
    separators_tried: AtomicU64,
    /// Candidates skipped because a component was known to fail
    negative_cache_hits: AtomicU64,
    negative_cache_entries: AtomicU64,
    /// Branch and bound candidates cut by the cost bound
    candidates_pruned: AtomicU64,
    decomps_emitted: AtomicU64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_nodes_created(&self) {
        self.nodes_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_separators_tried(&self) {
        self.separators_tried.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_negative_cache_hits(&self) {
        self.negative_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_negative_cache_entries(&self) {
        self.negative_cache_entries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_candidates_pruned(&self) {
        self.candidates_pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decomps_emitted(&self) {
        self.decomps_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_created: self.nodes_created.load(Ordering::Relaxed),
            separators_tried: self.separators_tried.load(Ordering::Relaxed),
            negative_cache_hits: self.negative_cache_hits.load(Ordering::Relaxed),
            negative_cache_entries: self.negative_cache_entries.load(Ordering::Relaxed),
            candidates_pruned: self.candidates_pruned.load(Ordering::Relaxed),
            decomps_emitted: self.decomps_emitted.load(Ordering::Relaxed),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub nodes_created: u64,
    pub separators_tried: u64,
    pub negative_cache_hits: u64,
    pub negative_cache_entries: u64,
    pub candidates_pruned: u64,
    pub decomps_emitted: u64,
}
