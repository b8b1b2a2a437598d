//! Search error types
//!
//! Error codes:
//! - HD_SEARCH_ITERATOR_EXHAUSTED (FATAL)
//! - HD_SEARCH_COST_MISMATCH (FATAL)
//! - HD_SEARCH_INVALID_CONFIG (FATAL)
//! - HD_SEARCH_INVARIANT_VIOLATED (FATAL)
//! - HD_SEARCH_EVALUATION_FAILED (severity of the underlying statistics error)
//!
//! Failing to find a decomposition is not an error: the stream just ends.

use std::fmt;

use crate::stats::{Severity, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// `next` called on an exhausted separator iterator
    IteratorExhausted,
    /// Recomputed tree cost differs from the incrementally tracked cost
    CostMismatch,
    /// Unusable search configuration
    InvalidConfig,
    /// A subproblem solved before could not be solved again
    InvariantViolated,
    /// The cost function failed
    EvaluationFailed,
}

impl SearchErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SearchErrorCode::IteratorExhausted => "HD_SEARCH_ITERATOR_EXHAUSTED",
            SearchErrorCode::CostMismatch => "HD_SEARCH_COST_MISMATCH",
            SearchErrorCode::InvalidConfig => "HD_SEARCH_INVALID_CONFIG",
            SearchErrorCode::InvariantViolated => "HD_SEARCH_INVARIANT_VIOLATED",
            SearchErrorCode::EvaluationFailed => "HD_SEARCH_EVALUATION_FAILED",
        }
    }
}

impl fmt::Display for SearchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchError {
    code: SearchErrorCode,
    message: String,
    cause: Option<StatsError>,
}

impl SearchError {
    pub fn iterator_exhausted() -> Self {
        Self {
            code: SearchErrorCode::IteratorExhausted,
            message: "separator iterator advanced past its last candidate".into(),
            cause: None,
        }
    }

    pub fn cost_mismatch(recomputed: u64, tracked: u64) -> Self {
        Self {
            code: SearchErrorCode::CostMismatch,
            message: format!(
                "recomputed tree cost {} differs from tracked cost {}",
                recomputed, tracked
            ),
            cause: None,
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self {
            code: SearchErrorCode::InvalidConfig,
            message: reason.into(),
            cause: None,
        }
    }

    pub fn invariant_violated(reason: impl Into<String>) -> Self {
        Self {
            code: SearchErrorCode::InvariantViolated,
            message: reason.into(),
            cause: None,
        }
    }

    pub fn code(&self) -> SearchErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        match &self.cause {
            Some(cause) => cause.severity(),
            None => Severity::Fatal,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The statistics error behind an evaluation failure
    pub fn cause(&self) -> Option<&StatsError> {
        self.cause.as_ref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl From<StatsError> for SearchError {
    fn from(err: StatsError) -> Self {
        Self {
            code: SearchErrorCode::EvaluationFailed,
            message: err.to_string(),
            cause: Some(err),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
