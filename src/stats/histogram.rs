//! Per-attribute value frequencies

use std::collections::BTreeMap;

/// Exact value → frequency map for one attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    freqs: BTreeMap<String, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `val`; true if the value is new
    pub fn increment(&mut self, val: &str) -> bool {
        match self.freqs.get_mut(val) {
            Some(freq) => {
                *freq += 1;
                false
            }
            None => {
                self.freqs.insert(val.to_string(), 1);
                true
            }
        }
    }

    /// Sets the frequency of `val`; true if the value is new
    pub fn set(&mut self, val: &str, freq: u64) -> bool {
        self.freqs.insert(val.to_string(), freq).is_none()
    }

    /// Frequency of `val`, 0 when absent
    pub fn frequency(&self, val: &str) -> u64 {
        self.freqs.get(val).copied().unwrap_or(0)
    }

    pub fn sum(&self) -> u64 {
        self.freqs.values().sum()
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.freqs.iter().map(|(v, f)| (v.as_str(), *f))
    }
}

impl FromIterator<(String, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            freqs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_frequency() {
        let mut h = Histogram::new();
        assert!(h.increment("a"));
        assert!(!h.increment("a"));
        assert!(h.increment("b"));
        assert_eq!(h.frequency("a"), 2);
        assert_eq!(h.frequency("zz"), 0);
        assert_eq!(h.sum(), 3);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_set_overwrites() {
        let mut h = Histogram::new();
        assert!(h.set("x", 4));
        assert!(!h.set("x", 7));
        assert_eq!(h.frequency("x"), 7);
    }
}
