//! In-memory relations
//!
//! A `Table` has a fixed attribute list chosen at creation, an ordered list
//! of fixed-arity tuples, and optionally statistics maintained alongside the
//! tuples. Tuples are only ever appended or removed in place.

use std::collections::{BTreeMap, HashMap};

use super::errors::{DbError, DbResult};
use crate::stats::Statistics;

/// One row of values
pub type Tuple = Vec<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    attrs: Vec<String>,
    attr_pos: HashMap<String, usize>,
    tuples: Vec<Tuple>,
    stats: Option<Statistics>,
}

impl Table {
    /// Creates an empty table; attributes must be non-empty and distinct
    pub fn new(attrs: Vec<String>) -> DbResult<Self> {
        if attrs.is_empty() {
            return Err(DbError::InvalidSchema("a table needs at least one attribute".into()));
        }
        let mut attr_pos = HashMap::with_capacity(attrs.len());
        for (i, a) in attrs.iter().enumerate() {
            if attr_pos.insert(a.clone(), i).is_some() {
                return Err(DbError::InvalidSchema(format!("attribute '{}' repeated", a)));
            }
        }
        Ok(Self {
            attrs,
            attr_pos,
            tuples: Vec::new(),
            stats: None,
        })
    }

    /// Creates an empty table that maintains exact statistics as tuples arrive
    pub fn with_statistics(attrs: Vec<String>) -> DbResult<Self> {
        let mut table = Self::new(attrs)?;
        table.stats = Some(Statistics::new(table.attrs.clone()));
        Ok(table)
    }

    pub fn attributes(&self) -> &[String] {
        &self.attrs
    }

    pub fn position(&self, attr: &str) -> Option<usize> {
        self.attr_pos.get(attr).copied()
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Attached statistics, if this table maintains them
    pub fn statistics(&self) -> Option<&Statistics> {
        self.stats.as_ref()
    }

    /// Exact statistics: the attached ones, or computed from the tuples
    pub fn compute_statistics(&self) -> Statistics {
        match &self.stats {
            Some(stats) => stats.clone(),
            None => Statistics::from_tuples(
                self.attrs.clone(),
                self.tuples.iter().map(|t| t.as_slice()),
            ),
        }
    }

    /// Appends a tuple; its arity must match the attribute list
    pub fn add_tuple(&mut self, tuple: Tuple) -> DbResult<()> {
        if tuple.len() != self.attrs.len() {
            return Err(DbError::ArityMismatch {
                relation: self.attrs.join(","),
                expected: self.attrs.len(),
                found: tuple.len(),
            });
        }
        if let Some(stats) = &mut self.stats {
            stats.observe(&tuple);
        }
        self.tuples.push(tuple);
        Ok(())
    }

    pub fn add_tuples(&mut self, tuples: impl IntoIterator<Item = Tuple>) -> DbResult<()> {
        for tuple in tuples {
            self.add_tuple(tuple)?;
        }
        Ok(())
    }

    /// Deletes the tuples at `indices`, which must be sorted, unique and in
    /// range. Survivors keep their relative order. Returns true if anything
    /// was removed.
    pub fn remove_tuples(&mut self, indices: &[usize]) -> DbResult<bool> {
        if indices.is_empty() {
            return Ok(false);
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DbError::InvalidRemoval(
                "indices must be sorted and unique".into(),
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= self.tuples.len() {
                return Err(DbError::InvalidRemoval(format!(
                    "index {} out of range for {} tuples",
                    last,
                    self.tuples.len()
                )));
            }
        }

        let mut doomed = indices.iter().peekable();
        let mut pos = 0usize;
        self.tuples.retain(|_| {
            let drop = doomed.peek().map_or(false, |&&i| i == pos);
            if drop {
                doomed.next();
            }
            pos += 1;
            !drop
        });

        if self.stats.is_some() {
            self.stats = Some(Statistics::from_tuples(
                self.attrs.clone(),
                self.tuples.iter().map(|t| t.as_slice()),
            ));
        }
        Ok(true)
    }

    /// Set equality on tuples, ignoring attribute order and tuple order.
    ///
    /// Duplicate tuples are counted.
    pub fn deep_eq(&self, other: &Table) -> bool {
        if self.attrs.len() != other.attrs.len() || self.len() != other.len() {
            return false;
        }
        let mut mapping = Vec::with_capacity(self.attrs.len());
        for attr in &self.attrs {
            match other.position(attr) {
                Some(p) => mapping.push(p),
                None => return false,
            }
        }

        let mut counts: BTreeMap<Vec<&str>, i64> = BTreeMap::new();
        for t in &self.tuples {
            *counts.entry(t.iter().map(String::as_str).collect()).or_insert(0) += 1;
        }
        for t in &other.tuples {
            let aligned: Vec<&str> = mapping.iter().map(|&p| t[p].as_str()).collect();
            *counts.entry(aligned).or_insert(0) -= 1;
        }
        counts.values().all(|&c| c == 0)
    }
}

#[cfg(test)]
pub(crate) fn row(vals: &[&str]) -> Tuple {
    vals.iter().map(|v| v.to_string()).collect()
}
