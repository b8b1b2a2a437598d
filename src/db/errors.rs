//! Relational instance errors
//!
//! All of these are FATAL at the CLI level: a malformed instance aborts the
//! run before any evaluation.

use thiserror::Error;

/// Result type for table and instance operations
pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("HD_DB_IO: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HD_DB_MALFORMED: record {record}: {reason}")]
    Malformed { record: usize, reason: String },

    #[error("HD_DB_ARITY_MISMATCH: relation '{relation}' expects {expected} values, got {found}")]
    ArityMismatch {
        relation: String,
        expected: usize,
        found: usize,
    },

    #[error("HD_DB_INVALID_SCHEMA: {0}")]
    InvalidSchema(String),

    #[error("HD_DB_INVALID_REMOVAL: {0}")]
    InvalidRemoval(String),

    #[error("HD_DB_UNKNOWN_RELATION: '{0}'")]
    UnknownRelation(String),
}

impl DbError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "HD_DB_IO",
            Self::Malformed { .. } => "HD_DB_MALFORMED",
            Self::ArityMismatch { .. } => "HD_DB_ARITY_MISMATCH",
            Self::InvalidSchema(_) => "HD_DB_INVALID_SCHEMA",
            Self::InvalidRemoval(_) => "HD_DB_INVALID_REMOVAL",
            Self::UnknownRelation(_) => "HD_DB_UNKNOWN_RELATION",
        }
    }

    pub(crate) fn malformed(record: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            record,
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for DbError {
    fn from(err: csv::Error) -> Self {
        let record = err
            .position()
            .map(|p| p.record() as usize)
            .unwrap_or(0);
        DbError::malformed(record, err.to_string())
    }
}
