//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

#[cfg(feature = "server")]
use crate::config::{DEFAULT_HOST, DEFAULT_PORT};
use crate::expr::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPONENT, DEFAULT_MAX_LENGTH, EvalLimits};
use clap::{Parser, Subcommand};

/// talkcalc: safe arithmetic evaluation for a keypad and voice calculator.
///
/// Evaluates arithmetic expressions from the command line or serves the
/// calculator web page and its JSON endpoint.
#[derive(Parser, Debug)]
#[command(name = "talkcalc")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Maximum expression length in characters.
    #[arg(long, global = true, env = "TALKCALC_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Maximum nesting of parentheses, signs, and powers.
    #[arg(long, global = true, env = "TALKCALC_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum absolute exponent accepted by `**`.
    #[arg(long, global = true, env = "TALKCALC_MAX_EXPONENT", default_value_t = DEFAULT_MAX_EXPONENT)]
    pub max_exponent: f64,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate an expression.
    ///
    /// Words are joined with spaces, so quoting is optional. With no
    /// expression, evaluates each non-blank line of stdin.
    #[command(alias = "calc")]
    Eval {
        /// Expression text.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Print the normalized form of an expression without evaluating it.
    Normalize {
        /// Expression text.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        expression: Vec<String>,
    },

    /// Serve the calculator page and the `/calculate` endpoint.
    #[cfg(feature = "server")]
    Serve {
        /// Host or IP address to bind.
        #[arg(long, env = "TALKCALC_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind.
        #[arg(short, long, env = "TALKCALC_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

impl Cli {
    /// Returns the evaluation limits selected by flags or environment.
    #[must_use]
    pub const fn limits(&self) -> EvalLimits {
        EvalLimits {
            max_length: self.max_length,
            max_depth: self.max_depth,
            max_exponent: self.max_exponent,
        }
    }
}
