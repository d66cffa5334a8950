//! Command implementation and argument parsing for the digraphgen CLI.

use std::convert::Infallible;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use digraphgen_core::{DEFAULT_RETRY_BUDGET, GeneratedGraph, GeneratorBuilder, GraphGenError};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Positional parameters and tuning flags parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "digraphgen",
    version,
    about = "Generate a random directed graph and write it as an edge list.",
    arg_required_else_help = true,
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Number of vertices in the graph.
    pub num_vertices: u32,

    /// Length of the guaranteed backbone path `0 -> 1 -> ... -> depth-1`.
    pub min_graph_depth: u32,

    /// Number of random edges to place beyond the backbone.
    pub additional_edges: u32,

    /// `true` allows cycles; any other value keeps the graph acyclic.
    #[arg(action = ArgAction::Set, value_parser = parse_literal_flag)]
    pub has_cycles: bool,

    /// `true` shuffles the vertex labels in the output.
    #[arg(action = ArgAction::Set, value_parser = parse_literal_flag)]
    pub shuffle: bool,

    /// File to write the edge list to.
    pub output_name: PathBuf,

    /// Fixes the random seed so the output can be reproduced.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Consecutive rejected candidates tolerated before giving up.
    #[arg(long = "retry-budget", default_value_t = DEFAULT_RETRY_BUDGET)]
    pub retry_budget: u32,
}

/// Interprets a boolean positional: only the exact literal `true` enables.
///
/// # Errors
/// Never fails; the signature matches clap's value parser contract.
///
/// # Examples
/// ```
/// use digraphgen_cli::cli::parse_literal_flag;
///
/// assert_eq!(parse_literal_flag("true"), Ok(true));
/// assert_eq!(parse_literal_flag("True"), Ok(false));
/// assert_eq!(parse_literal_flag("1"), Ok(false));
/// ```
pub fn parse_literal_flag(raw: &str) -> Result<bool, Infallible> {
    Ok(raw == "true")
}

/// How the binary responds to a failed argument parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Help or version output was requested; clap renders it.
    Informational,
    /// Arguments were missing or surplus; print usage and exit successfully.
    Usage,
    /// An argument was present but its value was rejected.
    Invalid,
}

impl ParseFailure {
    /// Classifies a clap error kind.
    ///
    /// # Examples
    /// ```
    /// use clap::error::ErrorKind;
    /// use digraphgen_cli::cli::ParseFailure;
    ///
    /// assert_eq!(
    ///     ParseFailure::classify(ErrorKind::MissingRequiredArgument),
    ///     ParseFailure::Usage,
    /// );
    /// assert_eq!(
    ///     ParseFailure::classify(ErrorKind::ValueValidation),
    ///     ParseFailure::Invalid,
    /// );
    /// ```
    #[must_use]
    pub const fn classify(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Informational,
            ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Self::Usage,
            _ => Self::Invalid,
        }
    }
}

/// Writes the full usage text to `writer`.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn write_usage(mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "{}", Cli::command().render_help())
}

/// Errors surfaced while executing the command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Creating or writing the output file failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Parameter validation or generation failed.
    #[error(transparent)]
    Core(#[from] GraphGenError),
}

/// Summarises a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// File the edge list was written to.
    pub output: PathBuf,
    /// Vertex count of the generated graph.
    pub vertices: u32,
    /// Edge count of the generated graph, backbone included.
    pub edges: u32,
    /// Seed that reproduces this graph.
    pub seed: u64,
}

/// Generates the graph described by `cli` and writes it to the output file.
///
/// The output file is only created once generation has succeeded, so a
/// rejected or infeasible request leaves the filesystem untouched.
///
/// # Errors
/// Returns [`CliError::Core`] when validation or sampling fails and
/// [`CliError::Io`] when the output file cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use digraphgen_cli::cli::{Cli, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let cli = Cli {
///     num_vertices: 5,
///     min_graph_depth: 3,
///     additional_edges: 0,
///     has_cycles: false,
///     shuffle: false,
///     output_name: dir.path().join("graph.txt"),
///     seed: Some(1),
///     retry_budget: 256,
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.edges, 2);
/// assert_eq!(std::fs::read_to_string(&summary.output)?, "5\n2\n0 1\n1 2\n");
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(output = field::Empty, seed = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    span.record("output", field::display(cli.output_name.display()));

    let generated = generate(&cli)?;
    span.record("seed", generated.seed());
    write_output(&cli.output_name, &generated)?;

    let summary = ExecutionSummary {
        output: cli.output_name,
        vertices: generated.graph().vertex_count(),
        edges: generated.graph().edge_count(),
        seed: generated.seed(),
    };
    let report = generated.report();
    info!(
        output = %summary.output.display(),
        edges = summary.edges,
        seed = summary.seed,
        rejected = report.rejected,
        longest_streak = report.longest_streak,
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.generate",
    err,
    skip(cli),
    fields(
        vertices = cli.num_vertices,
        min_depth = cli.min_graph_depth,
        additional_edges = cli.additional_edges,
        cycles = cli.has_cycles,
        shuffle = cli.shuffle,
        seed = field::Empty,
    ),
)]
pub(super) fn generate(cli: &Cli) -> Result<GeneratedGraph, CliError> {
    let builder = GeneratorBuilder::new()
        .with_vertex_count(cli.num_vertices)
        .with_min_depth(cli.min_graph_depth)
        .with_additional_edges(cli.additional_edges)
        .with_cycles(cli.has_cycles)
        .with_shuffle(cli.shuffle)
        .with_retry_budget(cli.retry_budget);
    let generator = match cli.seed {
        Some(seed) => builder.with_seed(seed).build()?,
        None => builder.build()?,
    };

    let generated = generator.generate()?;
    Span::current().record("seed", generated.seed());
    if cli.seed.is_none() {
        info!(
            seed = generated.seed(),
            "no seed supplied; pass --seed to reproduce this graph"
        );
    }
    Ok(generated)
}

#[instrument(
    name = "cli.write_output",
    err,
    skip(generated),
    fields(path = field::Empty, edges = generated.graph().edge_count()),
)]
pub(super) fn write_output(path: &Path, generated: &GeneratedGraph) -> Result<(), CliError> {
    Span::current().record("path", field::display(path.display()));
    let io_error = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    generated.write_to(&mut writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;
    Ok(())
}

/// Writes `error` and each of its sources to `writer`, one per line.
///
/// The binary sends this to `stderr` so a failure is reported even when the
/// log filter suppresses the error event.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// use digraphgen_cli::cli::{CliError, render_error};
/// use digraphgen_core::GraphGenError;
///
/// let error = CliError::from(GraphGenError::CyclesRequireAdditionalEdges);
/// let mut buffer = Vec::new();
/// render_error(&error, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8_lossy(&buffer),
///     "error: has_cycles must be false when additional_edges is less than 1\n",
/// );
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_error(error: &(dyn Error + 'static), mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "error: {error}")?;
    let mut source = error.source();
    while let Some(cause) = source {
        writeln!(writer, "  caused by: {cause}")?;
        source = cause.source();
    }
    Ok(())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use digraphgen_cli::cli::{ExecutionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     output: "graph.txt".into(),
///     vertices: 5,
///     edges: 2,
///     seed: 9,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "output: graph.txt\nvertices: 5\nedges: 2\nseed: 9\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "output: {}", summary.output.display())?;
    writeln!(writer, "vertices: {}", summary.vertices)?;
    writeln!(writer, "edges: {}", summary.edges)?;
    writeln!(writer, "seed: {}", summary.seed)?;
    Ok(())
}
