//! Join, semijoin and selection size estimators
//!
//! Two families share one contract: given the statistics of every input,
//! produce the statistics (size included) of the result.
//!
//! - Histogram-backed: exact per-value frequency products.
//! - Estimate-backed: the independence formula over sizes and NDVs.
//!
//! Inputs mixing both kinds are governed by `MixedStatsPolicy`.

use serde::{Deserialize, Serialize};

use super::errors::{StatsError, StatsResult};
use super::statistics::Statistics;

/// Selectivities below this are treated as an empty result
const MIN_SELECTIVITY: f64 = 1e-9;

/// What to do when histogram-backed and estimate-backed inputs meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixedStatsPolicy {
    /// Fail with HD_STATS_MIXED_UNSUPPORTED
    Reject,
    /// Re-estimate with the size/NDV formulas only
    #[default]
    Degrade,
}

impl MixedStatsPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MixedStatsPolicy::Reject => "reject",
            MixedStatsPolicy::Degrade => "degrade",
        }
    }
}

impl std::str::FromStr for MixedStatsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reject" => Ok(MixedStatsPolicy::Reject),
            "degrade" => Ok(MixedStatsPolicy::Degrade),
            other => Err(format!("unknown mixed statistics policy '{}'", other)),
        }
    }
}

/// Kind of estimate a set of inputs supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classification {
    Histograms,
    Estimates,
    Mixed,
}

fn classify(inputs: &[&Statistics]) -> Classification {
    let exact = inputs.iter().filter(|s| s.is_exact()).count();
    if exact == inputs.len() {
        Classification::Histograms
    } else if exact == 0 {
        Classification::Estimates
    } else {
        Classification::Mixed
    }
}

/// Estimates the natural join of `inputs`
pub fn estimate_join(inputs: &[&Statistics], policy: MixedStatsPolicy) -> StatsResult<Statistics> {
    if inputs.is_empty() {
        return Err(StatsError::malformed("join estimate over no relations"));
    }
    match classify(inputs) {
        Classification::Histograms => Ok(hgram_join(inputs)),
        Classification::Estimates => Ok(naive_join(inputs)),
        Classification::Mixed => match policy {
            MixedStatsPolicy::Reject => Err(StatsError::mixed_unsupported("join estimate")),
            MixedStatsPolicy::Degrade => Ok(naive_join(inputs)),
        },
    }
}

/// Estimates the semijoin of `left` by `right`; the result has `left`'s attributes
pub fn estimate_semijoin(
    left: &Statistics,
    right: &Statistics,
    policy: MixedStatsPolicy,
) -> StatsResult<Statistics> {
    match classify(&[left, right]) {
        Classification::Histograms => Ok(hgram_semijoin(left, right)),
        Classification::Estimates => Ok(naive_semijoin(left, right)),
        Classification::Mixed => match policy {
            MixedStatsPolicy::Reject => Err(StatsError::mixed_unsupported("semijoin estimate")),
            MixedStatsPolicy::Degrade => Ok(naive_semijoin(left, right)),
        },
    }
}

/// Estimated size of `attr = val` over one relation.
///
/// Uses the exact histogram frequency when the attribute has a histogram,
/// otherwise `round(size / ndv)`.
pub fn estimate_selection(stats: &Statistics, attr: &str, val: &str) -> StatsResult<u64> {
    let pos = stats
        .position(attr)
        .ok_or_else(|| StatsError::missing(format!("attribute '{}'", attr)))?;
    let hgram = stats.histogram_at(pos);
    if !hgram.is_empty() {
        return Ok(hgram.frequency(val));
    }
    let ndv = stats.ndv_at(pos);
    if stats.size() == 0 || ndv == 0 {
        return Ok(0);
    }
    Ok((stats.size() as f64 / ndv as f64).round() as u64)
}

/// Result attributes in order of first appearance, with the inputs holding each
fn join_attrs(inputs: &[&Statistics]) -> (Vec<String>, Vec<Vec<usize>>) {
    let mut attrs: Vec<String> = Vec::new();
    let mut holders: Vec<Vec<usize>> = Vec::new();
    for (i, stats) in inputs.iter().enumerate() {
        for attr in stats.attributes() {
            match attrs.iter().position(|a| a == attr) {
                Some(p) => holders[p].push(i),
                None => {
                    attrs.push(attr.clone());
                    holders.push(vec![i]);
                }
            }
        }
    }
    (attrs, holders)
}

fn product_of_sizes(inputs: &[&Statistics]) -> f64 {
    inputs.iter().map(|s| s.size() as f64).product()
}

fn hgram_join(inputs: &[&Statistics]) -> Statistics {
    if inputs.len() == 1 {
        return inputs[0].clone();
    }

    let (attrs, holders) = join_attrs(inputs);
    let mut empty = Statistics::new(attrs.clone());
    empty.finish_histogram_estimate();
    if inputs.iter().any(|s| s.size() == 0) {
        return empty;
    }
    let sizes = product_of_sizes(inputs);

    let mut result = Statistics::new(attrs.clone());
    let mut sel = 1.0;
    for (pos, attr) in attrs.iter().enumerate() {
        let sharing: Vec<&Statistics> = holders[pos].iter().map(|&i| inputs[i]).collect();
        if let [only] = sharing.as_slice() {
            copy_histogram(only, attr, &mut result, pos);
            continue;
        }
        let matches = join_matching_tuples(attr, &sharing, &mut result, pos);
        if matches == 0 {
            return empty;
        }
        let d = matches as f64 / product_of_sizes(&sharing);
        if d < MIN_SELECTIVITY {
            return empty;
        }
        sel *= d;
    }

    result.set_size((sel * sizes).round() as u64);
    result.finish_histogram_estimate();
    result
}

/// Copies the histogram of `attr` in `from` into position `pos` of `result`
fn copy_histogram(from: &Statistics, attr: &str, result: &mut Statistics, pos: usize) {
    if let Some(h) = from.histogram(attr) {
        for (val, freq) in h.iter() {
            result.record_value(pos, val, freq);
        }
    }
}

/// Number of matching tuple combinations on `attr`, recording the per-value
/// products into the histogram at `pos` of `result`
fn join_matching_tuples(attr: &str, sharing: &[&Statistics], result: &mut Statistics, pos: usize) -> u64 {
    let hgrams: Vec<_> = sharing
        .iter()
        .filter_map(|s| s.histogram(attr))
        .collect();
    if hgrams.len() != sharing.len() {
        return 0;
    }
    // drive the scan from the smallest histogram
    let Some((first, _)) = hgrams.iter().enumerate().min_by_key(|(_, h)| h.len()) else {
        return 0;
    };

    let mut n = 0u64;
    for (val, freq) in hgrams[first].iter() {
        let mut joint = freq;
        for (i, h) in hgrams.iter().enumerate() {
            if i != first {
                joint = joint.saturating_mul(h.frequency(val));
            }
        }
        if joint > 0 {
            result.record_value(pos, val, joint);
            n = n.saturating_add(joint);
        }
    }
    n
}

// T(R join S) = T(R) * T(S) / max(V(R,Y), V(S,Y)), generalized to k inputs
fn naive_join(inputs: &[&Statistics]) -> Statistics {
    let (attrs, holders) = join_attrs(inputs);
    let mut result = Statistics::new(attrs.clone());
    if inputs.iter().any(|s| s.size() == 0) {
        return result;
    }
    let num = product_of_sizes(inputs);

    let mut den = 1.0;
    for (pos, attr) in attrs.iter().enumerate() {
        let mut ndvs: Vec<u64> = holders[pos]
            .iter()
            .map(|&i| inputs[i].ndv(attr).unwrap_or(0))
            .collect();
        if ndvs.len() > 1 {
            ndvs.sort_unstable_by(|a, b| b.cmp(a));
            let k = ndvs.len();
            den *= ndvs[..k - 1].iter().map(|&v| v.max(1) as f64).product::<f64>();
            result.set_ndv(attr, ndvs[k - 1]);
        } else {
            result.set_ndv(attr, ndvs[0]);
        }
    }

    result.set_size((num / den).round() as u64);
    result
}

fn hgram_semijoin(left: &Statistics, right: &Statistics) -> Statistics {
    let mut empty = Statistics::new(left.attributes().to_vec());
    empty.finish_histogram_estimate();
    if left.size() == 0 || right.size() == 0 {
        return empty;
    }
    if !left.attributes().iter().any(|a| right.contains(a)) {
        return left.clone();
    }

    let mut result = Statistics::new(left.attributes().to_vec());
    let mut sel = 1.0;
    for (pos, attr) in left.attributes().iter().enumerate() {
        let Some(rh) = right.histogram(attr) else {
            copy_histogram(left, attr, &mut result, pos);
            continue;
        };
        let Some(lh) = left.histogram(attr) else {
            continue;
        };
        let total = lh.sum();
        if total == 0 {
            continue;
        }
        let mut n = 0u64;
        for (val, freq) in lh.iter() {
            if rh.frequency(val) > 0 {
                n += freq;
                result.record_value(pos, val, freq);
            }
        }
        if n == 0 {
            return empty;
        }
        let d = n as f64 / total as f64;
        if d < MIN_SELECTIVITY {
            return empty;
        }
        sel *= d;
    }

    result.set_size((sel * left.size() as f64).round() as u64);
    result.finish_histogram_estimate();
    result
}

fn naive_semijoin(left: &Statistics, right: &Statistics) -> Statistics {
    let mut result = Statistics::new(left.attributes().to_vec());
    if left.size() == 0 || right.size() == 0 {
        return result;
    }

    let mut bound = 1u64;
    for (pos, attr) in left.attributes().iter().enumerate() {
        let left_ndv = left.ndv_at(pos);
        match right.ndv(attr) {
            Some(right_ndv) => {
                let ndv = left_ndv.min(right_ndv).max(1);
                bound = bound.saturating_mul(ndv);
                result.set_ndv(attr, ndv);
            }
            None => {
                bound = bound.saturating_mul(left_ndv.max(1));
                result.set_ndv(attr, left_ndv);
            }
        }
    }

    if bound <= left.size() {
        result.set_size(bound);
        result
    } else {
        left.clone()
    }
}

/// Greedy join order over a set of relations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOrder {
    /// Input positions in join order
    pub indices: Vec<usize>,
    /// Sum of the estimated sizes of every intermediate result
    pub cost: u64,
}

/// Picks the cheapest pair, then repeatedly the cheapest extension
pub fn join_order(inputs: &[&Statistics], policy: MixedStatsPolicy) -> StatsResult<JoinOrder> {
    if inputs.len() < 2 {
        return Ok(JoinOrder {
            indices: (0..inputs.len()).collect(),
            cost: 0,
        });
    }

    let mut best: Option<(u64, usize, usize)> = None;
    for i in 0..inputs.len() {
        for j in i + 1..inputs.len() {
            let size = estimate_join(&[inputs[i], inputs[j]], policy)?.size();
            if best.map_or(true, |(b, _, _)| size < b) {
                best = Some((size, i, j));
            }
        }
    }
    let Some((first_cost, i, j)) = best else {
        return Err(StatsError::malformed("no join pair"));
    };

    let mut indices = vec![i, j];
    let mut cost = first_cost;
    let mut remaining: Vec<usize> = (0..inputs.len()).filter(|k| *k != i && *k != j).collect();

    while !remaining.is_empty() {
        let mut pick: Option<(u64, usize)> = None;
        for (slot, &k) in remaining.iter().enumerate() {
            let mut chosen: Vec<&Statistics> = indices.iter().map(|&p| inputs[p]).collect();
            chosen.push(inputs[k]);
            let size = estimate_join(&chosen, policy)?.size();
            if pick.map_or(true, |(b, _)| size < b) {
                pick = Some((size, slot));
            }
        }
        let Some((size, slot)) = pick else { break };
        indices.push(remaining.remove(slot));
        cost = cost.saturating_add(size);
    }

    Ok(JoinOrder { indices, cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Histogram;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn exact(names: &[&str], rows: &[&[&str]]) -> Statistics {
        let rows: Vec<Vec<String>> = rows.iter().map(|r| attrs(r)).collect();
        Statistics::from_tuples(attrs(names), rows.iter().map(|r| r.as_slice()))
    }

    fn estimated(names: &[&str], size: u64, ndvs: &[u64]) -> Statistics {
        let mut s = Statistics::new(attrs(names));
        s.set_size(size);
        for (n, v) in names.iter().zip(ndvs) {
            s.set_ndv(n, *v);
        }
        s
    }

    /// R(A,B) with A = {1:2, 2:3}; S(A,C) with A = {1:5, 2:1}
    fn worked_example() -> (Statistics, Statistics) {
        let r = exact(
            &["A", "B"],
            &[&["1", "x"], &["1", "y"], &["2", "x"], &["2", "y"], &["2", "z"]],
        );
        let s = exact(
            &["A", "C"],
            &[
                &["1", "a"],
                &["1", "b"],
                &["1", "c"],
                &["1", "d"],
                &["1", "e"],
                &["2", "a"],
            ],
        );
        (r, s)
    }

    #[test]
    fn test_histogram_join_worked_example() {
        let (r, s) = worked_example();
        let joined = estimate_join(&[&r, &s], MixedStatsPolicy::Reject).unwrap();
        assert_eq!(joined.size(), 2 * 5 + 3 * 1);
        assert_eq!(joined.attributes(), &attrs(&["A", "B", "C"])[..]);
        let a = joined.histogram("A").unwrap();
        assert_eq!(a.frequency("1"), 10);
        assert_eq!(a.frequency("2"), 3);
        assert_eq!(joined.ndv("A"), Some(2));
    }

    #[test]
    fn test_histogram_join_disjoint_is_empty() {
        let r = exact(&["A"], &[&["1"], &["2"]]);
        let s = exact(&["A"], &[&["3"]]);
        let joined = estimate_join(&[&r, &s], MixedStatsPolicy::Reject).unwrap();
        assert_eq!(joined.size(), 0);
    }

    #[test]
    fn test_histogram_join_single_input() {
        let (r, _) = worked_example();
        let joined = estimate_join(&[&r], MixedStatsPolicy::Reject).unwrap();
        assert_eq!(joined, r);
    }

    #[test]
    fn test_naive_join_k_way() {
        let r = estimated(&["A"], 100, &[10]);
        let s = estimated(&["A", "B"], 50, &[20, 5]);
        let t = estimated(&["A"], 10, &[5]);
        let joined = estimate_join(&[&r, &s, &t], MixedStatsPolicy::Reject).unwrap();
        // 100 * 50 * 10 / (20 * 10)
        assert_eq!(joined.size(), 250);
        assert_eq!(joined.ndv("A"), Some(5));
        assert_eq!(joined.ndv("B"), Some(5));
    }

    #[test]
    fn test_mixed_join_policy() {
        let (r, _) = worked_example();
        let s = estimated(&["A", "C"], 6, &[2, 5]);
        let err = estimate_join(&[&r, &s], MixedStatsPolicy::Reject).unwrap_err();
        assert_eq!(err.code().code(), "HD_STATS_MIXED_UNSUPPORTED");
        assert!(!err.is_fatal());

        let degraded = estimate_join(&[&r, &s], MixedStatsPolicy::Degrade).unwrap();
        // 5 * 6 / max(2, 2)
        assert_eq!(degraded.size(), 15);
    }

    #[test]
    fn test_histogram_semijoin() {
        let r = exact(&["A", "B"], &[&["1", "x"], &["1", "y"], &["2", "x"], &["3", "z"]]);
        let s = exact(&["A"], &[&["1"], &["3"]]);
        let reduced = estimate_semijoin(&r, &s, MixedStatsPolicy::Reject).unwrap();
        assert_eq!(reduced.size(), 3);
        assert_eq!(reduced.histogram("A").unwrap().frequency("2"), 0);

        let unrelated = exact(&["Q"], &[&["1"]]);
        let same = estimate_semijoin(&r, &unrelated, MixedStatsPolicy::Reject).unwrap();
        assert_eq!(same, r);
    }

    #[test]
    fn test_join_result_feeds_histogram_join() {
        let (r, s) = worked_example();
        let rs = estimate_join(&[&r, &s], MixedStatsPolicy::Reject).unwrap();
        assert!(rs.is_exact());
        // B of R scaled from 5 to 13 tuples: x = 5, y = 5, z = 3
        assert_eq!(rs.histogram("B").unwrap().frequency("z"), 3);

        let t = exact(&["B", "D"], &[&["x", "1"], &["z", "1"], &["z", "2"]]);
        let rst = estimate_join(&[&rs, &t], MixedStatsPolicy::Reject).unwrap();
        assert!(rst.is_exact());
        assert_eq!(rst.size(), 5 * 1 + 3 * 2);
    }

    #[test]
    fn test_join_result_feeds_histogram_semijoin() {
        let (r, s) = worked_example();
        let rs = estimate_join(&[&r, &s], MixedStatsPolicy::Reject).unwrap();
        let t = exact(&["C"], &[&["a"], &["b"]]);

        // C of S scaled from 6 to 13 tuples: a = 4, b..e = 2; 6 of 12 survive
        let reduced = estimate_semijoin(&rs, &t, MixedStatsPolicy::Reject).unwrap();
        assert!(reduced.is_exact());
        assert_eq!(reduced.size(), 7);
        assert_eq!(reduced.histogram("C").unwrap().frequency("c"), 0);
        assert!(reduced.size() <= rs.size());

        let again = estimate_semijoin(&reduced, &t, MixedStatsPolicy::Reject).unwrap();
        assert!(again.is_exact());
    }

    #[test]
    fn test_naive_semijoin_bound() {
        let left = estimated(&["A", "B"], 1000, &[10, 20]);
        let right = estimated(&["A"], 50, &[4]);
        let reduced = estimate_semijoin(&left, &right, MixedStatsPolicy::Reject).unwrap();
        // min(10, 4) * 20
        assert_eq!(reduced.size(), 80);
        assert_eq!(reduced.ndv("A"), Some(4));

        let small = estimated(&["A", "B"], 30, &[10, 20]);
        let unchanged = estimate_semijoin(&small, &right, MixedStatsPolicy::Reject).unwrap();
        assert_eq!(unchanged, small);
    }

    #[test]
    fn test_selection() {
        let (r, _) = worked_example();
        assert_eq!(estimate_selection(&r, "A", "2").unwrap(), 3);

        let est = estimated(&["A"], 100, &[8]);
        assert_eq!(estimate_selection(&est, "A", "anything").unwrap(), 13);
        assert!(estimate_selection(&est, "Z", "1").unwrap_err().is_fatal());
    }

    #[test]
    fn test_join_order_prefers_selective_pair() {
        let big = exact(&["A", "B"], &[&["1", "1"], &["1", "2"], &["1", "3"], &["2", "1"]]);
        let small = exact(&["B", "C"], &[&["9", "1"]]);
        let mid = exact(&["A", "D"], &[&["1", "x"], &["2", "y"]]);
        let order = join_order(&[&big, &small, &mid], MixedStatsPolicy::Reject).unwrap();
        assert_eq!(order.indices, vec![0, 1, 2]);
        assert_eq!(order.cost, 0);

        let trivial = join_order(&[&big], MixedStatsPolicy::Reject).unwrap();
        assert_eq!(trivial.indices, vec![0]);
    }

    #[test]
    fn test_histogram_from_iter() {
        let h: Histogram = vec![("a".to_string(), 3)].into_iter().collect();
        assert_eq!(h.sum(), 3);
    }
}
