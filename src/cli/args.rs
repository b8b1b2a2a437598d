//! CLI argument definitions using clap
//!
//! Commands:
//! - hdgen decompose --graph <path> --width <k> [--mode enum|best|bnb] ...
//! - hdgen answer --graph <path> --db <path> --width <k> [--all]
//!
//! Every `decompose` flag overrides the matching field of the JSON run
//! configuration given with `--config`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::config::SearchMode;
use crate::observability::Severity;
use crate::search::ShrinkMode;
use crate::stats::MixedStatsPolicy;

/// hdgen - bounded-width hypertree decompositions and Yannakakis evaluation
#[derive(Parser, Debug)]
#[command(name = "hdgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream decompositions of a hypergraph
    Decompose(DecomposeArgs),

    /// Decompose a query and evaluate it against a relational instance
    Answer(AnswerArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct DecomposeArgs {
    /// JSON run configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hypergraph in HyperBench format
    #[arg(long)]
    pub graph: Option<PathBuf>,

    /// Maximum number of edges per node cover
    #[arg(long)]
    pub width: Option<usize>,

    /// enum, best or bnb
    #[arg(long)]
    pub mode: Option<SearchMode>,

    /// Stop after this many decompositions (0 = all)
    #[arg(long)]
    pub enum_limit: Option<usize>,

    /// Cancel the search after this many milliseconds (0 = never)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Only produce decompositions covering every edge in a single bag
    #[arg(long)]
    pub complete: bool,

    /// Remove redundant nodes: soft or hard
    #[arg(long)]
    pub shrink: Option<ShrinkMode>,

    /// Write each decomposition to <prefix>_<index>.gml
    #[arg(long)]
    pub gml: Option<String>,

    /// Relational instance to evaluate against
    #[arg(long)]
    pub eval_db: Option<PathBuf>,

    /// Precomputed join size estimates
    #[arg(long)]
    pub eval_join: Option<PathBuf>,

    /// Precomputed size and NDV statistics
    #[arg(long)]
    pub eval_stats: Option<PathBuf>,

    /// With --eval-db: histogram evaluation over the relations (true) or the statistics cache (false)
    #[arg(long)]
    pub informed: Option<bool>,

    /// Remember separator/component pairs without a decomposition
    #[arg(long)]
    pub negative_cache: Option<bool>,

    /// reject or degrade when histogram and estimate statistics meet
    #[arg(long)]
    pub mixed_stats: Option<MixedStatsPolicy>,

    /// trace, info, warn, error or fatal
    #[arg(long)]
    pub log_level: Option<Severity>,
}

#[derive(Args, Debug, Clone)]
pub struct AnswerArgs {
    /// Hypergraph of the query in HyperBench format
    #[arg(long)]
    pub graph: PathBuf,

    /// Relational instance, one relation per edge name
    #[arg(long)]
    pub db: PathBuf,

    /// Maximum number of edges per node cover
    #[arg(long)]
    pub width: usize,

    /// Print every answer instead of SAT/UNSAT
    #[arg(long)]
    pub all: bool,

    /// trace, info, warn, error or fatal
    #[arg(long, default_value = "info")]
    pub log_level: Severity,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
