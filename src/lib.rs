//! hdgen - bounded-width hypertree decompositions
//!
//! Searches generalized hypertree decompositions of bounded width, either
//! exhaustively or guided by a cardinality-based cost model, and evaluates
//! conjunctive queries along a decomposition with the Yannakakis algorithm.
//!
//! Modules, leaves first:
//! - `hypergraph`: vertices, edges, components, covers, decompositions
//! - `db`: tables and the join/semijoin/selection operators
//! - `stats`: histograms, NDVs and the join/semijoin estimators
//! - `eval`: decomposition cost functions
//! - `search`: the enum, best and branch-and-bound engines
//! - `yannakakis`: query evaluation over a decomposition
//! - `observability`: JSON logging, events and search counters
//! - `cli`: arguments, run configuration and commands

pub mod cli;
pub mod db;
pub mod eval;
pub mod hypergraph;
pub mod observability;
pub mod search;
pub mod stats;
pub mod yannakakis;
