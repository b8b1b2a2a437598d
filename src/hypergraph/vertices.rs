//! Sorted vertex-set operations
//!
//! Every vertex set handled by the decomposition search is a sorted,
//! duplicate-free `Vec<Vertex>`. All helpers here preserve that shape.

/// Dense vertex identifier assigned by the parser
pub type Vertex = usize;

/// Sorts and deduplicates a vertex list in place
pub fn normalize(vertices: &mut Vec<Vertex>) {
    vertices.sort_unstable();
    vertices.dedup();
}

/// Union of two sorted sets
pub fn union(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            out.push(b[j]);
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Intersection of two sorted sets
pub fn inter(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            out.push(a[i]);
            i += 1;
            j += 1;
        }
    }
    out
}

/// Elements of `a` not in `b`
pub fn diff(a: &[Vertex], b: &[Vertex]) -> Vec<Vertex> {
    a.iter()
        .copied()
        .filter(|v| b.binary_search(v).is_err())
        .collect()
}

/// True if every element of `a` is in `b`
pub fn is_subset(a: &[Vertex], b: &[Vertex]) -> bool {
    a.iter().all(|v| b.binary_search(v).is_ok())
}

/// True if the two sorted sets share at least one element
pub fn intersects(a: &[Vertex], b: &[Vertex]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] < b[j] {
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            return true;
        }
    }
    false
}
