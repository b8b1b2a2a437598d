//! Relation statistics
//!
//! A `Statistics` value describes one relation (a base table or the result
//! of joining an edge set): its size, and per attribute an NDV count and a
//! histogram. Histograms may be absent; an observed relation is
//! histogram-backed ("exact") only when every attribute carries a histogram
//! summing to the relation size. Results of the histogram estimators are
//! histogram-backed by construction. Otherwise only `size` and NDV are
//! trusted.

use std::collections::HashMap;

use super::histogram::Histogram;

/// Where the histograms of a `Statistics` value come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backing {
    /// Counted from tuples or loaded; exact iff every histogram sums to the size
    Observed,
    /// Produced by a histogram estimator over exact inputs
    Estimated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    attrs: Vec<String>,
    attr_pos: HashMap<String, usize>,
    size: u64,
    ndv: Vec<u64>,
    hgrams: Vec<Histogram>,
    backing: Backing,
}

impl Statistics {
    /// Empty statistics (size 0, no values) over `attrs`
    pub fn new(attrs: Vec<String>) -> Self {
        let attr_pos = attrs
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect();
        let n = attrs.len();
        Self {
            attrs,
            attr_pos,
            size: 0,
            ndv: vec![0; n],
            hgrams: vec![Histogram::new(); n],
            backing: Backing::Observed,
        }
    }

    /// Exact statistics computed from a list of tuples
    pub fn from_tuples<'a>(attrs: Vec<String>, tuples: impl IntoIterator<Item = &'a [String]>) -> Self {
        let mut stats = Self::new(attrs);
        for tuple in tuples {
            stats.observe(tuple);
        }
        stats
    }

    /// Accounts for one more tuple
    pub fn observe(&mut self, tuple: &[String]) {
        self.size += 1;
        for (i, val) in tuple.iter().enumerate().take(self.attrs.len()) {
            if self.hgrams[i].increment(val) {
                self.ndv[i] += 1;
            }
        }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attrs
    }

    pub fn position(&self, attr: &str) -> Option<usize> {
        self.attr_pos.get(attr).copied()
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.attr_pos.contains_key(attr)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    pub fn ndv(&self, attr: &str) -> Option<u64> {
        self.position(attr).map(|p| self.ndv[p])
    }

    pub fn ndv_at(&self, pos: usize) -> u64 {
        self.ndv[pos]
    }

    /// Sets the NDV of `attr`; false if the attribute is unknown
    pub fn set_ndv(&mut self, attr: &str, ndv: u64) -> bool {
        match self.position(attr) {
            Some(p) => {
                self.ndv[p] = ndv;
                true
            }
            None => false,
        }
    }

    pub fn histogram(&self, attr: &str) -> Option<&Histogram> {
        self.position(attr).map(|p| &self.hgrams[p])
    }

    pub fn histogram_at(&self, pos: usize) -> &Histogram {
        &self.hgrams[pos]
    }

    /// Records `freq` for `val` in the histogram of the attribute at `pos`,
    /// counting a new distinct value
    pub(crate) fn record_value(&mut self, pos: usize, val: &str, freq: u64) {
        if self.hgrams[pos].set(val, freq) {
            self.ndv[pos] += 1;
        }
    }

    /// Scales every histogram to sum to about `size`, keeping each seen
    /// value with frequency at least 1, and marks the result histogram-backed.
    /// NDVs become the number of kept values, capped by `size`.
    pub(crate) fn finish_histogram_estimate(&mut self) {
        let size = self.size;
        for pos in 0..self.hgrams.len() {
            let sum = self.hgrams[pos].sum();
            if sum != size && sum > 0 {
                let factor = size as f64 / sum as f64;
                let scaled: Histogram = self.hgrams[pos]
                    .iter()
                    .map(|(val, freq)| (val.to_string(), ((freq as f64 * factor).round() as u64).max(1)))
                    .collect();
                self.hgrams[pos] = scaled;
            }
            self.ndv[pos] = (self.hgrams[pos].len() as u64).min(size);
        }
        self.backing = Backing::Estimated;
    }

    /// True if histogram estimates apply: every attribute carries a histogram
    /// summing to `size`, or the value came from a histogram estimator
    pub fn is_exact(&self) -> bool {
        match self.backing {
            Backing::Estimated => true,
            Backing::Observed => self.hgrams.iter().all(|h| h.sum() == self.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(vals: &[&str]) -> Vec<String> {
        vals.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_tuples_is_exact() {
        let tuples = vec![row(&["1", "a"]), row(&["1", "b"]), row(&["2", "b"])];
        let stats = Statistics::from_tuples(
            row(&["A", "B"]),
            tuples.iter().map(|t| t.as_slice()),
        );
        assert_eq!(stats.size(), 3);
        assert_eq!(stats.ndv("A"), Some(2));
        assert_eq!(stats.ndv("B"), Some(2));
        assert_eq!(stats.histogram("A").unwrap().frequency("1"), 2);
        assert!(stats.is_exact());
    }

    #[test]
    fn test_size_and_ndv_only_is_estimate() {
        let mut stats = Statistics::new(row(&["A"]));
        stats.set_size(100);
        assert!(stats.set_ndv("A", 10));
        assert!(!stats.set_ndv("Z", 1));
        assert!(!stats.is_exact());
    }

    #[test]
    fn test_histogram_estimate_scaled_to_size() {
        let tuples = vec![row(&["1", "a"]), row(&["1", "b"]), row(&["2", "b"]), row(&["3", "c"])];
        let mut stats = Statistics::from_tuples(row(&["A", "B"]), tuples.iter().map(|t| t.as_slice()));
        stats.set_size(2);
        assert!(!stats.is_exact());

        stats.finish_histogram_estimate();
        assert!(stats.is_exact());
        let a = stats.histogram("A").unwrap();
        assert_eq!(a.frequency("1"), 1);
        assert_eq!(a.frequency("3"), 1);
        assert_eq!(stats.ndv("A"), Some(2));
    }

    #[test]
    fn test_empty_relation_is_exact() {
        assert!(Statistics::new(row(&["A", "B"])).is_exact());
    }
}
