//! Input Loading and Decompose Command Tests
//!
//! Runs the decompose command end to end over files on disk:
//! - Every evaluation source loads and drives the engines that need one
//! - Limits, completion, shrinking and GML output reach the written results
//! - Broken inputs fail before the search with an input error

use hdgen::cli::{decompose, run_decompose, DecomposeArgs, RunConfig, SearchMode};
use hdgen::observability::{Logger, Severity};
use hdgen::search::ShrinkMode;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const GRAPH: &str = "% a path of three relations\nA(x,y), B(y,z), C(z,w).";
const SIZES: &str = "A,10\nB,10\nC,10\nA,B,100\nB,C,100\nA,C,1000\nA,B,C,1000\n";
const STATS: &str = "\
size,A,10
ndv,A,x,5
ndv,A,y,10
size,B,10
ndv,B,y,10
ndv,B,z,2
size,C,10
ndv,C,z,2
ndv,C,w,10
";
const DB: &str = "r,A,x,y\nt,1,2\nt,1,3\nr,B,y,z\nt,2,5\nt,3,6\nr,C,z,w\nt,5,7\n";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn config(dir: &TempDir, width: usize) -> RunConfig {
    Logger::set_min_severity(Severity::Error);
    RunConfig {
        graph: Some(write(dir, "q.hg", GRAPH)),
        width,
        ..RunConfig::default()
    }
}

fn run(config: &RunConfig) -> (usize, String) {
    let mut out = Vec::new();
    let count = run_decompose(config, &mut out).unwrap();
    (count, String::from_utf8(out).unwrap())
}

fn costs(output: &str) -> Vec<u64> {
    output
        .lines()
        .filter_map(|l| l.strip_prefix("Cost: "))
        .map(|c| c.parse().unwrap())
        .collect()
}

fn gml_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().map_or(false, |x| x == "gml"))
        .count()
}

// =============================================================================
// Enumeration
// =============================================================================

/// The limit stops the stream after that many decompositions.
#[test]
fn test_enum_limit() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.enum_limit = 1;

    let (count, out) = run(&c);
    assert_eq!(count, 1);
    assert!(out.starts_with("Used algorithm: enum\nResult 0 (ran with K = 1)\n"));
    assert!(out.contains("Correct: true\n"));
    assert!(out.ends_with("1 decompositions were found.\n"));
    assert!(!out.contains("Cost: "));
}

/// Completed edges are stripped again before output and checking.
#[test]
fn test_complete_mode_outputs_valid_decomps() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.complete = true;
    c.enum_limit = 3;

    let (count, out) = run(&c);
    assert!(count >= 1);
    assert_eq!(out.matches("Correct: true").count(), count);
    assert!(!out.contains("Correct: false"));
}

/// Shrinking keeps every output valid and within the width bound.
#[test]
fn test_shrink_modes() {
    for mode in [ShrinkMode::Soft, ShrinkMode::Hard] {
        let dir = TempDir::new().unwrap();
        let mut c = config(&dir, 2);
        c.shrink = Some(mode);
        c.enum_limit = 5;

        let (count, out) = run(&c);
        assert!(count >= 1);
        assert_eq!(out.matches("Correct: true").count(), count);
    }
}

/// One GML file per emitted decomposition.
#[test]
fn test_gml_output() {
    let dir = TempDir::new().unwrap();
    let gml_dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.enum_limit = 2;
    c.gml = Some(gml_dir.path().join("decomp").to_str().unwrap().to_string());

    let (count, _) = run(&c);
    assert_eq!(gml_files(gml_dir.path()), count);
}

// =============================================================================
// Evaluation Sources
// =============================================================================

/// Branch-and-bound over size estimates: trivial first, then cheaper.
#[test]
fn test_bnb_with_estimates() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.mode = SearchMode::Bnb;
    c.eval_join = Some(write(&dir, "sizes.csv", SIZES));

    let (count, out) = run(&c);
    assert_eq!(count, 2);
    assert!(out.starts_with("Used algorithm: bnb\n"));
    let costs = costs(&out);
    assert_eq!(costs[0], 1000);
    assert!(costs[1] <= costs[0]);
}

/// Best selection over a statistics file emits exactly one decomposition.
#[test]
fn test_best_with_statistics() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.mode = SearchMode::Best;
    c.eval_stats = Some(write(&dir, "stats.csv", STATS));

    let (count, out) = run(&c);
    assert_eq!(count, 1);
    assert!(out.starts_with("Used algorithm: best\n"));
    assert_eq!(costs(&out).len(), 1);
}

/// A database source reports costs both informed and uninformed.
#[test]
fn test_enum_with_database_costs() {
    for informed in [true, false] {
        let dir = TempDir::new().unwrap();
        let mut c = config(&dir, 1);
        c.eval_db = Some(write(&dir, "db.csv", DB));
        c.informed = informed;
        c.enum_limit = 2;

        let (count, out) = run(&c);
        assert_eq!(costs(&out).len(), count);
    }
}

// =============================================================================
// Failures
// =============================================================================

/// An estimates file that misses an edge fails before any output.
#[test]
fn test_incomplete_estimates_rejected() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.mode = SearchMode::Bnb;
    c.eval_join = Some(write(&dir, "sizes.csv", "A,10\nB,10\n"));

    let mut out = Vec::new();
    let err = run_decompose(&c, &mut out).unwrap_err();
    assert_eq!(err.code_str(), "HD_CLI_INPUT_ERROR");
    assert!(out.is_empty());
}

/// Estimates naming an edge the graph lacks are malformed.
#[test]
fn test_unknown_edge_in_estimates() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.mode = SearchMode::Best;
    c.eval_join = Some(write(&dir, "sizes.csv", "A,10\nD,10\n"));

    let err = run_decompose(&c, &mut Vec::new()).unwrap_err();
    assert_eq!(err.code_str(), "HD_CLI_INPUT_ERROR");
}

/// A malformed hypergraph is an input error.
#[test]
fn test_malformed_graph() {
    let dir = TempDir::new().unwrap();
    let mut c = config(&dir, 1);
    c.graph = Some(write(&dir, "bad.hg", "A(x,y"));

    let err = run_decompose(&c, &mut Vec::new()).unwrap_err();
    assert_eq!(err.code_str(), "HD_CLI_INPUT_ERROR");
}

/// The command resolves a JSON config file and lets flags override it.
#[test]
fn test_decompose_from_config_file() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "q.hg", GRAPH);
    let json = format!(
        r#"{{"graph": {:?}, "width": 3, "enum_limit": 1, "log_level": "error"}}"#,
        graph.to_str().unwrap()
    );
    let args = DecomposeArgs {
        config: Some(write(&dir, "run.json", &json)),
        width: Some(1),
        ..DecomposeArgs::default()
    };

    let mut out = Vec::new();
    assert_eq!(decompose(&args, &mut out).unwrap(), 1);
    assert!(String::from_utf8(out).unwrap().contains("(ran with K = 1)"));
}

/// Best and bnb refuse to run without an evaluation source.
#[test]
fn test_cost_modes_need_source() {
    let dir = TempDir::new().unwrap();
    let graph = write(&dir, "q.hg", GRAPH);
    let args = DecomposeArgs {
        graph: Some(graph),
        width: Some(1),
        mode: Some(SearchMode::Best),
        log_level: Some(Severity::Error),
        ..DecomposeArgs::default()
    };
    let err = decompose(&args, &mut Vec::new()).unwrap_err();
    assert_eq!(err.code_str(), "HD_CLI_CONFIG_ERROR");
}
