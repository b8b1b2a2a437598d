//! Yannakakis evaluation errors
//!
//! An unsatisfiable query is not an error; these cover inputs that cannot
//! be evaluated at all.

use thiserror::Error;

use crate::db::DbError;
use crate::stats::StatsError;

pub type YannakakisResult<T> = Result<T, YannakakisError>;

#[derive(Debug, Error)]
pub enum YannakakisError {
    #[error("HD_YANNAKAKIS_MISSING_TABLE: no relation for covered edge '{0}'")]
    MissingTable(String),

    #[error("HD_YANNAKAKIS_EMPTY_COVER: a decomposition node covers no edge")]
    EmptyCover,

    #[error("HD_YANNAKAKIS_NOT_COMPUTED: node joins requested before compute_nodes")]
    NotComputed,

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

impl YannakakisError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTable(_) => "HD_YANNAKAKIS_MISSING_TABLE",
            Self::EmptyCover => "HD_YANNAKAKIS_EMPTY_COVER",
            Self::NotComputed => "HD_YANNAKAKIS_NOT_COMPUTED",
            Self::Db(err) => err.code(),
            Self::Stats(err) => err.code().code(),
        }
    }
}
