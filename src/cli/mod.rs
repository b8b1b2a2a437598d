//! CLI module for hdgen
//!
//! Provides command-line interface for:
//! - decompose: stream decompositions of a hypergraph
//! - answer: evaluate a query over a relational instance

mod args;
mod commands;
mod config;
mod errors;
mod output;
mod sources;

pub use args::{AnswerArgs, Cli, Command, DecomposeArgs};
pub use commands::{answer, decompose, run_command, run_decompose, Answer};
pub use config::{EvalSource, RunConfig, SearchMode};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use output::{write_answers, write_gml, write_stanza, write_summary, Stanza};
pub use sources::CostInputs;

/// Parses the process arguments and runs the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}
