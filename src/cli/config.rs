//! Run configuration
//!
//! Loaded from an optional JSON file, then overridden field by field by the
//! command-line flags, then validated once.
//!
//! ```json
//! {
//!   "graph": "queries/q1.hg",
//!   "width": 2,
//!   "mode": "bnb",
//!   "eval_join": "queries/q1.sizes.csv",
//!   "shrink": "soft"
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::args::DecomposeArgs;
use super::errors::{CliError, CliResult};
use crate::observability::Severity;
use crate::search::{SearchConfig, ShrinkMode};
use crate::stats::MixedStatsPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Enum,
    Best,
    Bnb,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Enum => "enum",
            SearchMode::Best => "best",
            SearchMode::Bnb => "bnb",
        }
    }

    pub fn needs_evaluator(&self) -> bool {
        matches!(self, SearchMode::Best | SearchMode::Bnb)
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enum" => Ok(SearchMode::Enum),
            "best" => Ok(SearchMode::Best),
            "bnb" => Ok(SearchMode::Bnb),
            other => Err(format!("mode '{}' unknown, choose between enum, best, bnb", other)),
        }
    }
}

/// Where decomposition costs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalSource {
    /// A relational instance; `informed` selects the histogram evaluator
    Database { path: PathBuf, informed: bool },
    /// Precomputed sizes per edge combination
    Estimates(PathBuf),
    /// Precomputed size and NDV statistics
    Statistics(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub graph: Option<PathBuf>,

    #[serde(default)]
    pub width: usize,

    #[serde(default)]
    pub mode: SearchMode,

    /// Number of decompositions to output; 0 means all
    #[serde(default)]
    pub enum_limit: usize,

    /// 0 means no timeout
    #[serde(default)]
    pub timeout_ms: u64,

    #[serde(default)]
    pub complete: bool,

    #[serde(default)]
    pub shrink: Option<ShrinkMode>,

    /// Prefix of the GML files to write
    #[serde(default)]
    pub gml: Option<String>,

    #[serde(default)]
    pub eval_db: Option<PathBuf>,

    #[serde(default)]
    pub eval_join: Option<PathBuf>,

    #[serde(default)]
    pub eval_stats: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub informed: bool,

    #[serde(default = "default_true")]
    pub negative_cache: bool,

    #[serde(default)]
    pub mixed_stats: MixedStatsPolicy,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            graph: None,
            width: 0,
            mode: SearchMode::default(),
            enum_limit: 0,
            timeout_ms: 0,
            complete: false,
            shrink: None,
            gml: None,
            eval_db: None,
            eval_join: None,
            eval_stats: None,
            informed: true,
            negative_cache: true,
            mixed_stats: MixedStatsPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("failed to read config {}: {}", path.display(), e)))?;
        let config: RunConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// File configuration (if any) with flags applied on top, validated
    pub fn resolve(args: &DecomposeArgs) -> CliResult<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(args);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, args: &DecomposeArgs) {
        if let Some(graph) = &args.graph {
            self.graph = Some(graph.clone());
        }
        if let Some(width) = args.width {
            self.width = width;
        }
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(limit) = args.enum_limit {
            self.enum_limit = limit;
        }
        if let Some(timeout) = args.timeout_ms {
            self.timeout_ms = timeout;
        }
        if args.complete {
            self.complete = true;
        }
        if let Some(shrink) = args.shrink {
            self.shrink = Some(shrink);
        }
        if let Some(gml) = &args.gml {
            self.gml = Some(gml.clone());
        }
        if let Some(path) = &args.eval_db {
            self.eval_db = Some(path.clone());
        }
        if let Some(path) = &args.eval_join {
            self.eval_join = Some(path.clone());
        }
        if let Some(path) = &args.eval_stats {
            self.eval_stats = Some(path.clone());
        }
        if let Some(informed) = args.informed {
            self.informed = informed;
        }
        if let Some(enabled) = args.negative_cache {
            self.negative_cache = enabled;
        }
        if let Some(policy) = args.mixed_stats {
            self.mixed_stats = policy;
        }
        if let Some(level) = args.log_level {
            self.log_level = level.as_str().to_ascii_lowercase();
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.graph.is_none() {
            return Err(CliError::config_error("a hypergraph is required (--graph)"));
        }
        if self.width == 0 {
            return Err(CliError::config_error("width must be at least 1"));
        }
        let sources = [&self.eval_db, &self.eval_join, &self.eval_stats]
            .iter()
            .filter(|s| s.is_some())
            .count();
        if sources > 1 {
            return Err(CliError::config_error(
                "choose only one of eval_db, eval_join and eval_stats",
            ));
        }
        if self.mode.needs_evaluator() && sources == 0 {
            return Err(CliError::config_error(format!(
                "mode {} requires one of eval_db, eval_join or eval_stats",
                self.mode
            )));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> CliResult<Severity> {
        self.log_level.parse().map_err(|e: String| CliError::config_error(e))
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::new(self.width).with_negative_cache(self.negative_cache)
    }

    pub fn eval_source(&self) -> Option<EvalSource> {
        if let Some(path) = &self.eval_db {
            return Some(EvalSource::Database {
                path: path.clone(),
                informed: self.informed,
            });
        }
        if let Some(path) = &self.eval_join {
            return Some(EvalSource::Estimates(path.clone()));
        }
        self.eval_stats.clone().map(EvalSource::Statistics)
    }
}
