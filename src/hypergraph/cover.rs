//! Resumable generator of bounded edge covers
//!
//! Enumerates subsets (as index lists into a bound edge list) of at most `k`
//! edges whose vertices cover a connection set. Subsets come out by
//! increasing size, lexicographically within a size. With an empty
//! connection set the only cover is the empty subset, produced once.

use super::graph::Edge;
use super::vertices::{self, Vertex};

/// Cover generator state; paused between calls to `next_subset`
#[derive(Debug, Clone)]
pub struct Cover {
    k: usize,
    conn: Vec<Vertex>,
    bound: Vec<Vec<Vertex>>,
    /// Next combination to test, `None` once exhausted
    pending: Option<Vec<usize>>,
}

impl Cover {
    /// Creates a generator over `bound` covering `conn` with at most `k` edges
    pub fn new(k: usize, conn: Vec<Vertex>, bound: &[Edge]) -> Self {
        let pending = if conn.is_empty() {
            Some(Vec::new())
        } else if k == 0 || bound.is_empty() {
            None
        } else {
            Some(vec![0])
        };
        Self {
            k,
            conn,
            bound: bound.iter().map(|e| e.vertices.clone()).collect(),
            pending,
        }
    }

    /// Returns the next covering subset, or `None` when exhausted
    pub fn next_subset(&mut self) -> Option<Vec<usize>> {
        while let Some(candidate) = self.pending.take() {
            self.pending = self.successor(&candidate);
            if self.covers(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_none()
    }

    fn covers(&self, subset: &[usize]) -> bool {
        let mut covered: Vec<Vertex> = subset
            .iter()
            .flat_map(|&i| self.bound[i].iter().copied())
            .collect();
        vertices::normalize(&mut covered);
        vertices::is_subset(&self.conn, &covered)
    }

    /// Next combination of the same size, or the first of the next size
    fn successor(&self, current: &[usize]) -> Option<Vec<usize>> {
        let n = self.bound.len();
        let size = current.len();
        if size == 0 {
            // the empty subset only exists for an empty connection set
            return None;
        }

        let mut next = current.to_vec();
        let mut i = size;
        while i > 0 {
            i -= 1;
            if next[i] < n - size + i {
                next[i] += 1;
                for j in i + 1..size {
                    next[j] = next[j - 1] + 1;
                }
                return Some(next);
            }
        }

        let grown = size + 1;
        if grown <= self.k.min(n) {
            Some((0..grown).collect())
        } else {
            None
        }
    }
}

impl Iterator for Cover {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_subset()
    }
}
