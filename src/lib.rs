//! # talkcalc
//!
//! Safe arithmetic evaluation for a keypad and voice calculator.
//!
//! talkcalc accepts untrusted expression text, parses it into a tree that
//! can only hold numeric literals and arithmetic operators, and evaluates
//! it under explicit resource limits. Anything else is rejected with a
//! structured error instead of being executed.
//!
//! ## Features
//!
//! - **Restricted grammar**: `+ - * / // % **`, unary signs, parentheses
//! - **Python semantics**: floor division and modulo follow the sign of the divisor
//! - **Bounded**: length, nesting depth, and exponent limits
//! - **HTTP surface**: `POST /calculate` plus the calculator page (feature `server`)
//!
//! ## Example
//!
//! ```
//! use talkcalc::{EvalError, evaluate};
//!
//! let evaluation = evaluate("(3 + 4) * 2").unwrap();
//! assert_eq!(evaluation.result.to_string(), "14");
//!
//! assert!(matches!(
//!     evaluate("__import__('os')"),
//!     Err(EvalError::Disallowed { .. })
//! ));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod expr;
pub mod logging;
#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types at crate root
pub use error::{CommandError, Error, EvalError, Result, ServerError};

// Re-export evaluator types
pub use expr::{EvalLimits, Evaluation, Evaluator, Expr, Number, evaluate};

// Re-export configuration
pub use config::ServerConfig;

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};

// Re-export server types (feature-gated)
#[cfg(feature = "server")]
pub use server::{AppState, router, serve};
