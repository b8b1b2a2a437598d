//! Semijoin Property Tests
//!
//! Relational operators and their estimators over seeded random tables:
//! - A semijoin result is a subset of its left input
//! - A semijoin is idempotent
//! - The semijoin estimate never exceeds the left input's size
//! - On a single shared attribute the histogram estimate is exact

use hdgen::db::{join, semijoin, Table};
use hdgen::stats::{estimate_join, estimate_semijoin, MixedStatsPolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

// =============================================================================
// Helper Functions
// =============================================================================

const SEEDS: u64 = 25;

fn random_table(rng: &mut StdRng, attrs: &[&str], rows: usize, domain: u32) -> Table {
    let mut table = Table::with_statistics(attrs.iter().map(|a| a.to_string()).collect()).unwrap();
    for _ in 0..rows {
        let row = attrs.iter().map(|_| rng.gen_range(0..domain).to_string()).collect();
        table.add_tuple(row).unwrap();
    }
    table
}

fn rows(table: &Table) -> BTreeSet<Vec<String>> {
    table.tuples().iter().cloned().collect()
}

// =============================================================================
// Operators
// =============================================================================

/// Every surviving tuple was in the left input and has a partner on the right.
#[test]
fn test_semijoin_is_subset_with_partners() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let left = random_table(&mut rng, &["a", "b"], 12, 5);
        let right = random_table(&mut rng, &["b", "c"], 8, 5);

        let mut reduced = left.clone();
        semijoin(&mut reduced, &right).unwrap();

        assert!(rows(&reduced).is_subset(&rows(&left)), "seed {}", seed);
        let partners: BTreeSet<&String> = right.tuples().iter().map(|t| &t[0]).collect();
        assert!(reduced.tuples().iter().all(|t| partners.contains(&t[1])), "seed {}", seed);
    }
}

/// A second semijoin by the same relation removes nothing.
#[test]
fn test_semijoin_idempotent() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut left = random_table(&mut rng, &["a", "b", "c"], 15, 4);
        let right = random_table(&mut rng, &["c", "a"], 6, 4);

        semijoin(&mut left, &right).unwrap();
        let once = left.clone();
        assert!(!semijoin(&mut left, &right).unwrap(), "seed {}", seed);
        assert!(left.deep_eq(&once), "seed {}", seed);
    }
}

/// The semijoin keeps exactly the left tuples that take part in the join.
#[test]
fn test_semijoin_matches_join_projection() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let left = random_table(&mut rng, &["a", "b"], 10, 4);
        let right = random_table(&mut rng, &["b", "c"], 10, 4);

        let joined = join(&left, &right).unwrap();
        let (pa, pb) = (joined.position("a").unwrap(), joined.position("b").unwrap());
        let projected: BTreeSet<Vec<String>> = joined
            .tuples()
            .iter()
            .map(|t| vec![t[pa].clone(), t[pb].clone()])
            .collect();

        let mut reduced = left.clone();
        semijoin(&mut reduced, &right).unwrap();
        assert_eq!(rows(&reduced), projected, "seed {}", seed);
    }
}

// =============================================================================
// Estimators
// =============================================================================

/// Semijoin estimates are bounded by the left size.
#[test]
fn test_semijoin_estimate_bounded() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let left = random_table(&mut rng, &["a", "b", "c"], 20, 6);
        let right = random_table(&mut rng, &["b", "c"], 9, 6);

        let estimate = estimate_semijoin(
            &left.compute_statistics(),
            &right.compute_statistics(),
            MixedStatsPolicy::Reject,
        )
        .unwrap();
        assert!(estimate.size() <= left.len() as u64, "seed {}", seed);
    }
}

/// One shared attribute with full histograms gives the exact semijoin size.
#[test]
fn test_semijoin_estimate_exact_on_single_attribute() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let left = random_table(&mut rng, &["a", "b"], 14, 5);
        let right = random_table(&mut rng, &["b", "c"], 7, 5);

        let estimate = estimate_semijoin(
            &left.compute_statistics(),
            &right.compute_statistics(),
            MixedStatsPolicy::Reject,
        )
        .unwrap();

        let mut reduced = left.clone();
        semijoin(&mut reduced, &right).unwrap();
        assert_eq!(estimate.size(), reduced.len() as u64, "seed {}", seed);
    }
}

/// Likewise the join estimate on one shared attribute.
#[test]
fn test_join_estimate_exact_on_single_attribute() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let left = random_table(&mut rng, &["a", "b"], 11, 4);
        let right = random_table(&mut rng, &["b", "c"], 9, 4);

        let (ls, rs) = (left.compute_statistics(), right.compute_statistics());
        let estimate = estimate_join(&[&ls, &rs], MixedStatsPolicy::Reject).unwrap();
        assert_eq!(estimate.size(), join(&left, &right).unwrap().len() as u64, "seed {}", seed);
    }
}
