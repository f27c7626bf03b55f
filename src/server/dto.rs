//! Request and response bodies for the calculate endpoint.

use crate::error::EvalError;
use crate::expr::{Evaluation, Number};
use serde::{Deserialize, Serialize};

/// Body of `POST /calculate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalculateRequest {
    /// Expression text. A missing field is treated as empty input.
    #[serde(default)]
    pub expression: String,
}

/// Body returned by `POST /calculate`.
///
/// Successful responses carry `expression` and `result`; failures carry
/// `error` and `kind`. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateResponse {
    /// Whether evaluation succeeded.
    pub ok: bool,
    /// Normalized expression text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Computed value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Number>,
    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable failure category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Raw input as received.
    pub input: String,
}

impl CalculateResponse {
    /// Builds a success response.
    #[must_use]
    pub fn success(input: String, evaluation: Evaluation) -> Self {
        Self {
            ok: true,
            expression: Some(evaluation.expression),
            result: Some(evaluation.result),
            error: None,
            kind: None,
            input,
        }
    }

    /// Builds a failure response from an evaluation error.
    #[must_use]
    pub fn failure(input: String, err: &EvalError) -> Self {
        Self::rejected(input, err.to_string(), err.kind())
    }

    /// Builds a failure response with an explicit message and kind.
    #[must_use]
    pub const fn rejected(input: String, error: String, kind: &'static str) -> Self {
        Self {
            ok: false,
            expression: None,
            result: None,
            error: Some(error),
            kind: Some(kind),
            input,
        }
    }
}
