//! Hypergraph error types
//!
//! Malformed hypergraph input is FATAL: the run aborts with a diagnostic.

use thiserror::Error;

/// Result type for hypergraph operations
pub type HypergraphResult<T> = Result<T, HypergraphError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HypergraphError {
    #[error("HD_GRAPH_MALFORMED: line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("HD_GRAPH_DUPLICATE_EDGE: edge '{0}' declared twice")]
    DuplicateEdge(String),

    #[error("HD_GRAPH_EMPTY: hypergraph has no edges")]
    Empty,

    #[error("HD_GRAPH_UNKNOWN_EDGE: '{0}'")]
    UnknownEdge(String),

    #[error("HD_GRAPH_UNKNOWN_VERTEX: '{0}'")]
    UnknownVertex(String),
}

impl HypergraphError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "HD_GRAPH_MALFORMED",
            Self::DuplicateEdge(_) => "HD_GRAPH_DUPLICATE_EDGE",
            Self::Empty => "HD_GRAPH_EMPTY",
            Self::UnknownEdge(_) => "HD_GRAPH_UNKNOWN_EDGE",
            Self::UnknownVertex(_) => "HD_GRAPH_UNKNOWN_VERTEX",
        }
    }
}
