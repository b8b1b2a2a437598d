//! CLI-specific error types
//!
//! Every CLI error is FATAL: `main` prints it and exits with status 1.

use std::fmt;
use std::io;

use crate::db::DbError;
use crate::hypergraph::HypergraphError;
use crate::search::SearchError;
use crate::stats::StatsError;
use crate::yannakakis::YannakakisError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or flag error
    ConfigError,
    /// File system or stdout error
    IoError,
    /// Malformed graph, instance or statistics file
    InputError,
    /// The search engine stopped on an error
    SearchFailed,
    /// An emitted decomposition failed the correctness check
    InvalidDecomposition,
    /// Query evaluation failed
    EvaluationFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "HD_CLI_CONFIG_ERROR",
            Self::IoError => "HD_CLI_IO_ERROR",
            Self::InputError => "HD_CLI_INPUT_ERROR",
            Self::SearchFailed => "HD_CLI_SEARCH_FAILED",
            Self::InvalidDecomposition => "HD_CLI_INVALID_DECOMPOSITION",
            Self::EvaluationFailed => "HD_CLI_EVALUATION_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InputError, msg)
    }

    pub fn invalid_decomposition(index: usize) -> Self {
        Self::new(
            CliErrorCode::InvalidDecomposition,
            format!("decomposition {} is not a valid decomposition of the input graph", index),
        )
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::config_error(format!("invalid config JSON: {}", e))
    }
}

impl From<HypergraphError> for CliError {
    fn from(e: HypergraphError) -> Self {
        Self::input_error(e.to_string())
    }
}

impl From<DbError> for CliError {
    fn from(e: DbError) -> Self {
        Self::input_error(e.to_string())
    }
}

impl From<StatsError> for CliError {
    fn from(e: StatsError) -> Self {
        Self::input_error(e.to_string())
    }
}

impl From<SearchError> for CliError {
    fn from(e: SearchError) -> Self {
        Self::new(CliErrorCode::SearchFailed, e.to_string())
    }
}

impl From<YannakakisError> for CliError {
    fn from(e: YannakakisError) -> Self {
        Self::new(CliErrorCode::EvaluationFailed, e.to_string())
    }
}

pub type CliResult<T> = Result<T, CliError>;
