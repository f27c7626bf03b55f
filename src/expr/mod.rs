//! Restricted arithmetic evaluation.
//!
//! Input text is tokenized, parsed into an [`Expr`] tree that can only
//! hold numeric literals and arithmetic operators, then evaluated
//! depth-first. Nothing in this module performs I/O or keeps state
//! between calls.
//!
//! - **Lexer**: numbers, operators, and enough extra token kinds to name
//!   what was rejected
//! - **Parser**: recursive descent with Python-compatible precedence
//! - **Eval**: exact integer arithmetic with float fallback

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod number;
pub mod parser;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use number::Number;

use crate::error::EvalError;
use serde::Serialize;

/// Default maximum input length in characters.
pub const DEFAULT_MAX_LENGTH: usize = 300;

/// Default maximum nesting of parentheses, unary operators, and powers.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum absolute exponent for `**`.
pub const DEFAULT_MAX_EXPONENT: f64 = 10_000.0;

/// Resource bounds applied to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvalLimits {
    /// Maximum input length in characters.
    pub max_length: usize,
    /// Maximum nesting depth.
    pub max_depth: usize,
    /// Maximum absolute exponent.
    pub max_exponent: f64,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }
}

/// A successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Normalized expression text; re-evaluating it gives the same result.
    pub expression: String,
    /// Computed value.
    pub result: Number,
}

/// Stateless evaluator configured with [`EvalLimits`].
///
/// The evaluator is `Copy` and holds no mutable state, so one instance can
/// be shared across threads freely.
///
/// # Examples
///
/// ```
/// use talkcalc::Evaluator;
///
/// let evaluator = Evaluator::new();
/// let evaluation = evaluator.evaluate("(3 + 4) * 2").unwrap();
/// assert_eq!(evaluation.result.to_string(), "14");
/// assert_eq!(evaluation.expression, "(3 + 4) * 2");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    limits: EvalLimits,
}

impl Evaluator {
    /// Creates an evaluator with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an evaluator with custom limits.
    #[must_use]
    pub const fn with_limits(limits: EvalLimits) -> Self {
        Self { limits }
    }

    /// Returns the configured limits.
    #[must_use]
    pub const fn limits(&self) -> &EvalLimits {
        &self.limits
    }

    /// Parses `input` into a tree without evaluating it.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::EmptyInput`] or [`EvalError::TooLong`] before
    /// parsing, otherwise any parse error.
    pub fn parse(&self, input: &str) -> Result<Expr, EvalError> {
        if input.trim().is_empty() {
            return Err(EvalError::EmptyInput);
        }
        let length = input.chars().count();
        if length > self.limits.max_length {
            return Err(EvalError::TooLong {
                length,
                max: self.limits.max_length,
            });
        }
        parser::parse(input, self.limits.max_depth)
    }

    /// Parses and evaluates `input`.
    ///
    /// # Errors
    ///
    /// Returns any [`EvalError`]; see [`Evaluator::parse`] for the checks
    /// made before evaluation.
    pub fn evaluate(&self, input: &str) -> Result<Evaluation, EvalError> {
        let expr = self.parse(input)?;
        let result = eval::eval(&expr, self.limits.max_exponent)?;
        tracing::trace!(nodes = expr.node_count(), %result, "evaluated expression");
        Ok(Evaluation {
            expression: self.normalized_text(&expr, input),
            result,
        })
    }

    /// Picks a normalized text that passes the length check on resubmission.
    ///
    /// Tries the spaced form, then the compact form, then the trimmed input
    /// itself. The input already passed the check and parses to the same
    /// tree.
    fn normalized_text(&self, expr: &Expr, input: &str) -> String {
        let fits = |text: &str| text.chars().count() <= self.limits.max_length;

        let spaced = expr.to_string();
        if fits(&spaced) {
            return spaced;
        }
        let compact = format!("{expr:#}");
        if fits(&compact) {
            return compact;
        }
        input.trim().to_string()
    }
}

/// Evaluates `input` with default limits.
///
/// # Errors
///
/// Returns any [`EvalError`].
///
/// # Examples
///
/// ```
/// use talkcalc::{EvalError, evaluate};
///
/// assert_eq!(evaluate("3 + 4 * 2").unwrap().result.to_string(), "11");
/// assert_eq!(evaluate("1 / 0").unwrap_err(), EvalError::DivisionByZero);
/// ```
pub fn evaluate(input: &str) -> Result<Evaluation, EvalError> {
    Evaluator::new().evaluate(input)
}
