//! Error types for talkcalc operations.
//!
//! This module provides the error hierarchy using `thiserror` for
//! expression evaluation, the HTTP server, configuration, and CLI I/O.

use thiserror::Error;

/// Result type alias for talkcalc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// CLI command errors.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// HTTP server errors.
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// I/O errors (stdin/stdout).
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors produced while evaluating an expression.
///
/// Every failure of the evaluator is one of these variants; none of them
/// escapes as a panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Input is empty or whitespace-only.
    #[error("empty expression")]
    EmptyInput,

    /// Input exceeds the configured length limit.
    #[error("expression too long: {length} characters exceeds limit of {max}")]
    TooLong {
        /// Length of the input in characters.
        length: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Input is not well-formed arithmetic.
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        /// Byte offset of the offending token.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// Input contains a construct outside the arithmetic allow-list.
    #[error("disallowed expression: {construct}")]
    Disallowed {
        /// Byte offset of the offending token.
        position: usize,
        /// Description of the construct (e.g. "function call `f`").
        construct: String,
    },

    /// Division, floor division, or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Catch-all for arithmetic failures such as overflow.
    #[error("evaluation error: {reason}")]
    Evaluation {
        /// Reason for failure.
        reason: String,
    },
}

impl EvalError {
    /// Stable machine-readable identifier for the error category.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::TooLong { .. } => "too_long",
            Self::Syntax { .. } => "syntax_error",
            Self::Disallowed { .. } => "disallowed_expression",
            Self::DivisionByZero => "division_by_zero",
            Self::Evaluation { .. } => "evaluation_error",
        }
    }

    /// Byte offset into the input where the error was detected, if known.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Syntax { position, .. } | Self::Disallowed { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn disallowed(position: usize, construct: impl Into<String>) -> Self {
        Self::Disallowed {
            position,
            construct: construct.into(),
        }
    }

    pub(crate) fn evaluation(reason: impl Into<String>) -> Self {
        Self::Evaluation {
            reason: reason.into(),
        }
    }
}

/// Errors raised by CLI commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The evaluator rejected the input.
    #[error("{error}")]
    Rejected {
        /// The input as given.
        input: String,
        /// Why it was rejected.
        error: EvalError,
    },
}

/// HTTP server errors.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind {addr}: {reason}")]
    Bind {
        /// Address that could not be bound.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// Server loop terminated with an error.
    #[error("server failed: {0}")]
    Serve(String),

    /// Async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(format!("serialization failed: {err}"))
    }
}
