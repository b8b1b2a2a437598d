//! Observable events
//!
//! Every log line names one of these.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Run lifecycle
    RunStart,
    RunComplete,
    ConfigLoaded,

    // Inputs
    GraphLoaded,
    DatabaseLoaded,
    StatisticsLoaded,

    // Search
    SearchBegin,
    DecompEmitted,
    /// Branch and bound emitted its trivial starting point
    BnbIncumbent,
    /// Branch and bound found a cheaper decomposition
    BnbImproved,
    BestSelected,
    SearchExhausted,
    SearchCancelled,
    /// The search stopped on an error (FATAL)
    SearchFailed,
    /// An emitted decomposition failed the correctness check (FATAL)
    DecompInvalid,
    ShrinkApplied,

    // Evaluation
    FullReduceComplete,
    /// A node's relation became empty
    YannakakisUnsat,
    AnswerComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RunStart => "RUN_BEGIN",
            Event::RunComplete => "RUN_COMPLETE",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::GraphLoaded => "GRAPH_LOADED",
            Event::DatabaseLoaded => "DATABASE_LOADED",
            Event::StatisticsLoaded => "STATISTICS_LOADED",

            Event::SearchBegin => "SEARCH_BEGIN",
            Event::DecompEmitted => "DECOMP_EMITTED",
            Event::BnbIncumbent => "BNB_INCUMBENT",
            Event::BnbImproved => "BNB_IMPROVED",
            Event::BestSelected => "BEST_SELECTED",
            Event::SearchExhausted => "SEARCH_EXHAUSTED",
            Event::SearchCancelled => "SEARCH_CANCELLED",
            Event::SearchFailed => "SEARCH_FAILED",
            Event::DecompInvalid => "DECOMP_INVALID",
            Event::ShrinkApplied => "SHRINK_APPLIED",

            Event::FullReduceComplete => "FULL_REDUCE_COMPLETE",
            Event::YannakakisUnsat => "YANNAKAKIS_UNSAT",
            Event::AnswerComplete => "ANSWER_COMPLETE",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::SearchFailed | Event::DecompInvalid)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
