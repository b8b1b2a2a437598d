//! Search configuration
//!
//! Passed explicitly to every engine constructor.

use serde::{Deserialize, Serialize};

use super::errors::{SearchError, SearchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of edges in any node's cover
    pub width: usize,

    /// Remember (separator, component) pairs without a decomposition
    #[serde(default = "default_negative_cache")]
    pub negative_cache: bool,
}

fn default_negative_cache() -> bool {
    true
}

impl SearchConfig {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            negative_cache: default_negative_cache(),
        }
    }

    pub fn with_negative_cache(mut self, enabled: bool) -> Self {
        self.negative_cache = enabled;
        self
    }

    pub fn validate(&self) -> SearchResult<()> {
        if self.width == 0 {
            return Err(SearchError::invalid_config("width must be at least 1"));
        }
        Ok(())
    }
}
