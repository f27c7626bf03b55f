//! Binary entry point for talkcalc.
//!
//! talkcalc: safe arithmetic evaluation for a keypad and voice calculator.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use talkcalc::cli::output::{OutputFormat, format_error};
use talkcalc::cli::{Cli, execute};
use talkcalc::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.format);
    logging::init(cli.verbose, cli.log_json);

    match execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                // Handle broken pipe gracefully (e.g., when piped to `head` or `jq`)
                if let Err(e) = write!(io::stdout(), "{output}")
                    && e.kind() != io::ErrorKind::BrokenPipe
                {
                    eprintln!("Error writing to stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let error_output = format_error(&e, format);
            match format {
                OutputFormat::Json => {
                    // JSON errors go to stdout for programmatic parsing
                    println!("{error_output}");
                }
                OutputFormat::Text => {
                    eprintln!("Error: {error_output}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
