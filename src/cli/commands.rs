//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    LineOutcome, OutputFormat, format_evaluation, format_line_outcomes, format_normalized,
};
use crate::cli::parser::{Cli, Commands};
use crate::config::validate_limits;
use crate::error::{CommandError, Result};
use crate::expr::Evaluator;
use std::io::{self, BufRead};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns [`crate::Error::Config`] if the limits are unusable, otherwise an
/// error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let limits = cli.limits();
    validate_limits(&limits)?;
    let evaluator = Evaluator::with_limits(limits);

    match &cli.command {
        Commands::Eval { expression } if expression.is_empty() => {
            cmd_eval_lines(&evaluator, io::stdin().lock(), format)
        }
        Commands::Eval { expression } => cmd_eval(&evaluator, &expression.join(" "), format),
        Commands::Normalize { expression } => {
            cmd_normalize(&evaluator, &expression.join(" "), format)
        }
        #[cfg(feature = "server")]
        Commands::Serve { host, port } => cmd_serve(cli, host, *port),
    }
}

fn cmd_eval(evaluator: &Evaluator, input: &str, format: OutputFormat) -> Result<String> {
    let evaluation = evaluator.evaluate(input).map_err(|error| CommandError::Rejected {
        input: input.to_string(),
        error,
    })?;
    Ok(format_evaluation(&evaluation, format))
}

/// Evaluates each non-blank line of `reader`.
///
/// A line that fails is reported in its own outcome and does not stop the
/// remaining lines.
fn cmd_eval_lines(
    evaluator: &Evaluator,
    reader: impl BufRead,
    format: OutputFormat,
) -> Result<String> {
    let mut outcomes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        outcomes.push(LineOutcome::new(input, evaluator.evaluate(input)));
    }

    let failed = outcomes.iter().filter(|o| !o.ok).count();
    tracing::debug!(lines = outcomes.len(), failed, "evaluated stdin");
    Ok(format_line_outcomes(&outcomes, format))
}

fn cmd_normalize(evaluator: &Evaluator, input: &str, format: OutputFormat) -> Result<String> {
    let expr = evaluator.parse(input).map_err(|error| CommandError::Rejected {
        input: input.to_string(),
        error,
    })?;
    Ok(format_normalized(&expr, format))
}

#[cfg(feature = "server")]
fn cmd_serve(cli: &Cli, host: &str, port: u16) -> Result<String> {
    use crate::config::ServerConfig;
    use crate::error::{Error, ServerError};

    let config = ServerConfig::new(host, port, cli.limits())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::from(ServerError::Runtime(e.to_string())))?;

    runtime.block_on(crate::server::serve(config))?;
    Ok(String::new())
}
