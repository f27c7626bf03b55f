//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::{CommandError, Error, EvalError};
use crate::expr::{Evaluation, Expr, Number};
use serde::Serialize;
use std::fmt::Write;
use unicode_segmentation::UnicodeSegmentation;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Outcome of one line in batch evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineOutcome {
    /// Whether the line evaluated.
    pub ok: bool,
    /// Raw input line.
    pub input: String,
    /// Normalized expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Computed value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Number>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl LineOutcome {
    /// Builds an outcome from an evaluation result.
    #[must_use]
    pub fn new(input: &str, outcome: Result<Evaluation, EvalError>) -> Self {
        match outcome {
            Ok(evaluation) => Self {
                ok: true,
                input: input.to_string(),
                expression: Some(evaluation.expression),
                result: Some(evaluation.result),
                error: None,
                kind: None,
            },
            Err(err) => Self {
                ok: false,
                input: input.to_string(),
                expression: None,
                result: None,
                error: Some(err.to_string()),
                kind: Some(err.kind()),
            },
        }
    }
}

/// Formats a single evaluation.
#[must_use]
pub fn format_evaluation(evaluation: &Evaluation, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{}\n", evaluation.result),
        OutputFormat::Json => format_json(evaluation),
    }
}

/// Formats the normalized form of an expression.
#[must_use]
pub fn format_normalized(expr: &Expr, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("{expr}\n"),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct NormalizedOutput {
                expression: String,
                nodes: usize,
            }
            format_json(&NormalizedOutput {
                expression: expr.to_string(),
                nodes: expr.node_count(),
            })
        }
    }
}

/// Formats batch results, one line per input.
#[must_use]
pub fn format_line_outcomes(outcomes: &[LineOutcome], format: OutputFormat) -> String {
    let mut output = String::new();
    for outcome in outcomes {
        match format {
            OutputFormat::Text => match (&outcome.expression, &outcome.result, &outcome.error) {
                (Some(expression), Some(result), _) => {
                    let _ = writeln!(output, "{expression} = {result}");
                }
                (_, _, error) => {
                    let _ = writeln!(
                        output,
                        "{}: error: {}",
                        outcome.input,
                        error.as_deref().unwrap_or("unknown error")
                    );
                }
            },
            OutputFormat::Json => {
                let line = serde_json::to_string(outcome).unwrap_or_else(|_| "{}".to_string());
                output.push_str(&line);
                output.push('\n');
            }
        }
    }
    output
}

/// Formats an error for display.
///
/// Text output for rejected input with a known position includes the
/// input and a caret under the offending column.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match err {
            Error::Command(CommandError::Rejected { input, error }) => {
                let mut output = error.to_string();
                if let Some(position) = error.position() {
                    output.push('\n');
                    output.push_str(&render_caret(input, position));
                }
                output
            }
            _ => err.to_string(),
        },
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput<'a> {
                ok: bool,
                error: String,
                kind: &'static str,
                #[serde(skip_serializing_if = "Option::is_none")]
                position: Option<usize>,
                #[serde(skip_serializing_if = "Option::is_none")]
                input: Option<&'a str>,
            }
            let output = match err {
                Error::Command(CommandError::Rejected { input, error }) => ErrorOutput {
                    ok: false,
                    error: error.to_string(),
                    kind: error.kind(),
                    position: error.position(),
                    input: Some(input),
                },
                Error::Config { .. } => ErrorOutput {
                    ok: false,
                    error: err.to_string(),
                    kind: "config_error",
                    position: None,
                    input: None,
                },
                Error::Server(_) => ErrorOutput {
                    ok: false,
                    error: err.to_string(),
                    kind: "server_error",
                    position: None,
                    input: None,
                },
                Error::Io(_) => ErrorOutput {
                    ok: false,
                    error: err.to_string(),
                    kind: "io_error",
                    position: None,
                    input: None,
                },
            };
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Renders `input` with a caret under byte offset `position`.
///
/// The column is counted in grapheme clusters so the caret lines up under
/// multi-byte operators such as `×`.
fn render_caret(input: &str, position: usize) -> String {
    let prefix = input.get(..position).unwrap_or(input);
    let column = prefix.graphemes(true).count();
    format!("  {input}\n  {}^", " ".repeat(column))
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}
