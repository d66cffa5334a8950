//! Command-line interface orchestration for the graph generator.
//!
//! The binary takes six positional parameters, generates a graph, writes it
//! as an edge list and reports a short summary.

mod commands;

pub use commands::{
    Cli, CliError, ExecutionSummary, ParseFailure, parse_literal_flag, render_error, render_summary,
    run_cli, write_usage,
};
