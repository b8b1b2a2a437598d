//! Statistics model
//!
//! Cardinality estimation for edge sets when the real answer sizes are not
//! available: per-attribute histograms and NDV counts, histogram-backed and
//! estimate-backed join/semijoin estimators, and caches keyed by edge-set
//! identity.

mod cache;
mod errors;
mod estimate;
mod histogram;
mod loader;
mod statistics;

pub use cache::{SizeEstimates, StatisticsDb};
pub use errors::{Severity, StatsError, StatsErrorCode, StatsResult};
pub use estimate::{
    estimate_join, estimate_selection, estimate_semijoin, join_order, JoinOrder, MixedStatsPolicy,
};
pub use histogram::Histogram;
pub use loader::{
    edge_set_attributes, load_estimates, load_statistics, read_estimates, read_statistics,
    stats_from_db,
};
pub use statistics::Statistics;
