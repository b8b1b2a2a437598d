//! Statistics error types
//!
//! Error codes:
//! - HD_STATS_MISSING (FATAL)
//! - HD_STATS_MIXED_UNSUPPORTED (ERROR)
//! - HD_STATS_DUPLICATE_ESTIMATE (FATAL)
//! - HD_STATS_MALFORMED (FATAL)

use std::fmt;

/// Severity levels shared by the statistics and search errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation failed; the caller may choose another strategy
    Error,
    /// Invariant violation or unusable input; the run must stop
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsErrorCode {
    /// Statistics requested for an edge set never registered
    Missing,
    /// Histogram-backed and estimate-backed inputs in one estimate
    MixedUnsupported,
    /// A raw size estimate registered twice for the same edge set
    DuplicateEstimate,
    /// Unparsable statistics or estimates input
    Malformed,
}

impl StatsErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StatsErrorCode::Missing => "HD_STATS_MISSING",
            StatsErrorCode::MixedUnsupported => "HD_STATS_MIXED_UNSUPPORTED",
            StatsErrorCode::DuplicateEstimate => "HD_STATS_DUPLICATE_ESTIMATE",
            StatsErrorCode::Malformed => "HD_STATS_MALFORMED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            StatsErrorCode::MixedUnsupported => Severity::Error,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for StatsErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Statistics error with code and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsError {
    code: StatsErrorCode,
    message: String,
}

impl StatsError {
    pub fn missing(what: impl Into<String>) -> Self {
        Self {
            code: StatsErrorCode::Missing,
            message: format!("no statistics registered for {}", what.into()),
        }
    }

    pub fn mixed_unsupported(what: impl Into<String>) -> Self {
        Self {
            code: StatsErrorCode::MixedUnsupported,
            message: format!(
                "histogram-backed and estimate-backed inputs mixed in {}",
                what.into()
            ),
        }
    }

    pub fn duplicate_estimate(what: impl Into<String>) -> Self {
        Self {
            code: StatsErrorCode::DuplicateEstimate,
            message: format!("estimate for {} already registered", what.into()),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            code: StatsErrorCode::Malformed,
            message: reason.into(),
        }
    }

    pub fn code(&self) -> StatsErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for StatsError {}

pub type StatsResult<T> = Result<T, StatsError>;
