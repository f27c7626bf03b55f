//! CLI layer for talkcalc.
//!
//! Provides the command-line interface using clap, with commands for
//! evaluating and normalizing expressions and for serving the calculator.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
