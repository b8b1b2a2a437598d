//! Decomposition search
//!
//! Depth-first search for generalized hypertree decompositions of bounded
//! width. Three engines share the separator iterator, the arena search tree
//! and the streaming contract:
//!
//! - `EnumSearch`: every decomposition, one at a time
//! - `BestSearch`: the cheapest decomposition under an evaluator
//! - `BnbSearch`: the trivial decomposition, then one cheaper one found by
//!   branch and bound
//!
//! Engines run on a producer thread and hand decompositions over a
//! rendezvous channel; a `CancelToken` stops them at the next hand-off.

mod best;
mod bnb;
mod cancel;
mod config;
mod enumerate;
mod errors;
mod negative_cache;
mod separator;
mod shrink;
mod streamer;
mod tree;

pub use best::BestSearch;
pub use bnb::BnbSearch;
pub use cancel::CancelToken;
pub use config::SearchConfig;
pub use enumerate::EnumSearch;
pub use errors::{SearchError, SearchErrorCode, SearchResult};
pub use negative_cache::NegativeCache;
pub use separator::SeparatorIterator;
pub use shrink::{shrink, ShrinkMode};
pub use streamer::{DecompStream, Streamer};
pub use tree::{NodeId, SearchNode, SearchTree};
