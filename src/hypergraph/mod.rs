//! Hypergraph capability
//!
//! Dense-id vertices and edges, component splitting, bounded edge covers,
//! the HyperBench parser and finished decompositions. The search engine,
//! the evaluators and the Yannakakis evaluator are built on this module.

mod cover;
mod decomp;
mod errors;
mod graph;
mod parser;
pub mod vertices;

pub use cover::Cover;
pub use decomp::{Decomp, Node};
pub use errors::{HypergraphError, HypergraphResult};
pub use graph::{Edge, EdgeId, EdgeSet, EdgeSetKey, Hypergraph};
pub use parser::{parse, Encoding, ParsedGraph};
pub use vertices::Vertex;
