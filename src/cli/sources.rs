//! Cost inputs loaded once per run
//!
//! The engine and the reporting step each get their own evaluator built
//! from the same loaded data, so input errors surface before the search.

use super::config::EvalSource;
use super::errors::CliResult;
use crate::db::{load_database, Database};
use crate::eval::{EstimateEvaluator, Evaluator, InformedEvaluator, StatisticsEvaluator};
use crate::hypergraph::{Encoding, Hypergraph};
use crate::observability::{log_event_with_fields, Event};
use crate::stats::{load_estimates, load_statistics, stats_from_db, MixedStatsPolicy, SizeEstimates, StatisticsDb};

#[derive(Debug, Clone)]
pub enum CostInputs {
    Database { db: Database, informed: bool },
    Estimates(SizeEstimates),
    Statistics(StatisticsDb),
}

impl CostInputs {
    pub fn load(source: &EvalSource, graph: &Hypergraph, encoding: &Encoding) -> CliResult<Self> {
        match source {
            EvalSource::Database { path, informed } => {
                let db = load_database(path)?;
                log_event_with_fields(
                    Event::DatabaseLoaded,
                    &[("path", &path.display().to_string()), ("relations", &db.len().to_string())],
                );
                Ok(CostInputs::Database {
                    db,
                    informed: *informed,
                })
            }
            EvalSource::Estimates(path) => {
                let sizes = load_estimates(path, graph, encoding)?;
                log_event_with_fields(
                    Event::StatisticsLoaded,
                    &[("kind", "estimates"), ("entries", &sizes.len().to_string())],
                );
                Ok(CostInputs::Estimates(sizes))
            }
            EvalSource::Statistics(path) => {
                let stats = load_statistics(path, graph, encoding)?;
                log_event_with_fields(
                    Event::StatisticsLoaded,
                    &[("kind", "statistics"), ("entries", &stats.len().to_string())],
                );
                Ok(CostInputs::Statistics(stats))
            }
        }
    }

    /// A fresh evaluator; fails if some edge of `graph` has no input
    pub fn evaluator(
        &self,
        graph: &Hypergraph,
        encoding: &Encoding,
        policy: MixedStatsPolicy,
    ) -> CliResult<Box<dyn Evaluator>> {
        let ev: Box<dyn Evaluator> = match self {
            CostInputs::Database { db, informed: true } => {
                Box::new(InformedEvaluator::new(db, graph, encoding, policy)?)
            }
            CostInputs::Database { db, informed: false } => {
                Box::new(StatisticsEvaluator::new(stats_from_db(db, encoding), graph, policy)?)
            }
            CostInputs::Estimates(sizes) => Box::new(EstimateEvaluator::new(sizes.clone(), graph)?),
            CostInputs::Statistics(stats) => Box::new(StatisticsEvaluator::new(stats.clone(), graph, policy)?),
        };
        Ok(ev)
    }
}
