//! CLI entry point for the `digraphgen` graph generator.
//!
//! Parses the positional parameters with clap, generates and writes the
//! graph, renders a summary to stdout, and maps failures to exit codes.
//! Logging is initialised first so every later step can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use digraphgen_cli::{
    cli::{Cli, CliError, ParseFailure, render_error, render_summary, run_cli, write_usage},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse arguments, execute the command, and render the summary.
fn try_main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_parse_failure(&err),
    };
    let summary = run_cli(cli).context("failed to generate graph")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(ExitCode::SUCCESS)
}

fn report_parse_failure(err: &clap::Error) -> Result<ExitCode> {
    match ParseFailure::classify(err.kind()) {
        ParseFailure::Informational => {
            err.print().context("failed to print help")?;
            Ok(ExitCode::SUCCESS)
        }
        ParseFailure::Usage => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_usage(&mut writer).context("failed to print usage")?;
            writer.flush().context("failed to flush output")?;
            Ok(ExitCode::SUCCESS)
        }
        ParseFailure::Invalid => {
            err.print().context("failed to report argument error")?;
            error!(kind = ?err.kind(), "invalid command-line arguments");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(code) => code,
        Err(err) => {
            let code = err
                .downcast_ref::<CliError>()
                .and_then(|cli_error| match cli_error {
                    CliError::Core(core) => Some(core.code()),
                    CliError::Io { .. } => None,
                });
            let code_field = code.map(|code| field::display(code.as_str()));
            error!(error = %format!("{err:#}"), code = code_field, "command execution failed");
            if let Err(write_err) = render_error(err.as_ref(), io::stderr().lock()) {
                error!(error = %write_err, "failed to report error on stderr");
            }
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
