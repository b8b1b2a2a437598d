//! Search Property Tests
//!
//! Properties checked over seeded random hypergraphs:
//! - Every emitted decomposition is correct and within the width bound
//! - The negative cache never changes what the enumeration emits
//! - Branch-and-bound never reports a decomposition dearer than the trivial one
//! - Best-first selection returns the cheapest enumerated decomposition

use hdgen::db::{Database, Table};
use hdgen::eval::{Cost, Evaluator, InformedEvaluator};
use hdgen::hypergraph::{parse, Decomp, ParsedGraph};
use hdgen::search::{BestSearch, BnbSearch, CancelToken, EnumSearch, SearchConfig, Streamer};
use hdgen::stats::MixedStatsPolicy;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

// =============================================================================
// Helper Functions
// =============================================================================

const SEEDS: u64 = 12;
const VERTICES: usize = 6;

/// Enumerations longer than this are not compared exhaustively
const ENUM_CAP: usize = 5_000;

fn random_graph(rng: &mut StdRng, edges: usize) -> ParsedGraph {
    let mut parts = Vec::with_capacity(edges);
    for i in 0..edges {
        let arity = rng.gen_range(2..=3);
        let vars: Vec<String> = sample(rng, VERTICES, arity)
            .into_iter()
            .map(|v| format!("v{}", v))
            .collect();
        parts.push(format!("E{}({})", i, vars.join(",")));
    }
    parse(&format!("{}.", parts.join(", "))).unwrap()
}

/// One small random relation per edge, attributes named after its vertices
fn random_db(rng: &mut StdRng, p: &ParsedGraph) -> Database {
    let mut db = Database::new();
    for edge in p.graph.edges() {
        let attrs = p.encoding.vertex_names(&edge.vertices);
        let mut table = Table::new(attrs.clone()).unwrap();
        for _ in 0..rng.gen_range(1..=6) {
            let row = attrs.iter().map(|_| rng.gen_range(0..3).to_string()).collect();
            table.add_tuple(row).unwrap();
        }
        db.insert(p.encoding.edge_name(edge.id), table);
    }
    db
}

fn evaluator(db: &Database, p: &ParsedGraph) -> InformedEvaluator {
    InformedEvaluator::new(db, &p.graph, &p.encoding, MixedStatsPolicy::Degrade).unwrap()
}

/// Drains the enumeration; `None` if it runs past the cap
fn enumerate(p: &ParsedGraph, config: &SearchConfig) -> Option<Vec<Decomp>> {
    let mut search = EnumSearch::new(p.graph.clone(), config).unwrap();
    let mut out = Vec::new();
    while let Some(decomp) = search.next_decomp().unwrap() {
        out.push(decomp);
        if out.len() > ENUM_CAP {
            return None;
        }
    }
    Some(out)
}

fn take(p: &ParsedGraph, config: &SearchConfig, n: usize) -> Vec<Decomp> {
    let mut search = EnumSearch::new(p.graph.clone(), config).unwrap();
    let mut out = Vec::new();
    while out.len() < n {
        match search.next_decomp().unwrap() {
            Some(decomp) => out.push(decomp),
            None => break,
        }
    }
    out
}

// =============================================================================
// Enumeration
// =============================================================================

/// Width bound and correctness hold for every emitted decomposition.
#[test]
fn test_enumeration_emits_correct_bounded_decomps() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let p = random_graph(&mut rng, 4);
        for width in 1..=2 {
            for decomp in take(&p, &SearchConfig::new(width), 200) {
                assert!(decomp.width() <= width, "seed {} width {}", seed, width);
                assert!(decomp.is_correct(&p.graph), "seed {} width {}", seed, width);
            }
        }
    }
}

/// A single-node decomposition exists once the width reaches the edge count.
#[test]
fn test_full_width_always_decomposes() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let p = random_graph(&mut rng, 3);
        let mut search = EnumSearch::new(p.graph.clone(), &SearchConfig::new(3)).unwrap();
        assert!(search.next_decomp().unwrap().is_some(), "seed {}", seed);
    }
}

/// The cache only skips candidates that are known to fail.
#[test]
fn test_negative_cache_does_not_change_output() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let p = random_graph(&mut rng, 5);
        let cached = take(&p, &SearchConfig::new(2), 100);
        let uncached = take(&p, &SearchConfig::new(2).with_negative_cache(false), 100);
        assert_eq!(cached, uncached, "seed {}", seed);
    }
}

// =============================================================================
// Cost-Driven Search
// =============================================================================

/// BnB emits the trivial decomposition first and then at most one cheaper one.
#[test]
fn test_bnb_never_worse_than_trivial() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let p = random_graph(&mut rng, 4);
        let db = random_db(&mut rng, &p);

        let bnb = BnbSearch::new(p.graph.clone(), &SearchConfig::new(2), Box::new(evaluator(&db, &p))).unwrap();
        let out: Vec<Decomp> = Box::new(bnb)
            .stream(CancelToken::new())
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(!out.is_empty() && out.len() <= 2, "seed {}", seed);
        assert_eq!(out[0], Decomp::trivial(&p.graph));

        let mut ev = evaluator(&db, &p);
        let trivial_cost = ev.eval(&out[0]).unwrap();
        if let Some(found) = out.get(1) {
            assert!(found.width() <= 2, "seed {}", seed);
            assert!(found.is_correct(&p.graph), "seed {}", seed);
            assert!(ev.eval(found).unwrap() <= trivial_cost, "seed {}", seed);
        }
    }
}

/// Best selection agrees with the minimum over the full enumeration.
#[test]
fn test_best_is_enumeration_minimum() {
    let mut compared = 0;
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let p = random_graph(&mut rng, 4);
        let db = random_db(&mut rng, &p);
        let config = SearchConfig::new(2);

        let Some(all) = enumerate(&p, &config) else {
            continue;
        };
        let mut ev = evaluator(&db, &p);
        let minimum: Option<Cost> = all.iter().map(|d| ev.eval(d).unwrap()).min();

        let mut best = BestSearch::new(p.graph.clone(), &config, Box::new(evaluator(&db, &p))).unwrap();
        let selected = best.select(&CancelToken::new()).unwrap();
        assert_eq!(selected.map(|(_, cost)| cost), minimum, "seed {}", seed);
        compared += 1;
    }
    assert!(compared > 0);
}

/// Costs are a pure function of the decomposition.
#[test]
fn test_evaluation_is_repeatable() {
    let mut rng = StdRng::seed_from_u64(7);
    let p = random_graph(&mut rng, 4);
    let db = random_db(&mut rng, &p);
    let mut ev = evaluator(&db, &p);
    for decomp in take(&p, &SearchConfig::new(2), 20) {
        let first = ev.eval(&decomp).unwrap();
        assert_eq!(ev.eval(&decomp).unwrap(), first);
        assert_eq!(evaluator(&db, &p).eval(&decomp).unwrap(), first);
    }
}
