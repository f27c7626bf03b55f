//! Numeric values produced by the evaluator.

use serde::{Serialize, Serializer};
use std::fmt;

/// Largest magnitude at which every integer is exactly representable as f64.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Magnitudes at or above this render in exponent notation.
const EXP_UPPER: f64 = 1e16;

/// Non-zero magnitudes below this render in exponent notation.
const EXP_LOWER: f64 = 1e-4;

/// A numeric value: integer while the arithmetic stays integral, float
/// otherwise.
///
/// # Examples
///
/// ```
/// use talkcalc::Number;
///
/// assert_eq!(Number::Int(11).to_string(), "11");
/// assert_eq!(Number::Float(2.5).to_string(), "2.5");
/// assert_eq!(Number::Float(2.0).to_string(), "2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
}

impl Number {
    /// Returns the value as f64.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns true if the value is zero (either representation).
    #[must_use]
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(i) => i == 0,
            Self::Float(f) => f == 0.0,
        }
    }

    /// Returns true if the value has no fractional part.
    #[must_use]
    pub fn is_integral(self) -> bool {
        match self {
            Self::Int(_) => true,
            Self::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    /// Returns true if the value is negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        match self {
            Self::Int(i) => i < 0,
            Self::Float(f) => f < 0.0,
        }
    }

    /// Returns the integer value of an integral number that fits exactly.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn as_exact_int(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            Self::Float(f) if self.is_integral() && f.abs() < EXACT_INT_LIMIT => Some(f as i64),
            Self::Float(_) => None,
        }
    }

    /// Writes the literal form used in normalized expressions.
    ///
    /// Floats keep a decimal point or exponent so the text lexes back to a
    /// float.
    pub(crate) fn write_literal(self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) if x == 0.0 => f.write_str("0"),
            Self::Float(x) => {
                let magnitude = x.abs();
                if let Some(i) = self.as_exact_int()
                    && magnitude < EXP_UPPER
                {
                    write!(f, "{i}")
                } else if magnitude >= EXP_UPPER || magnitude < EXP_LOWER {
                    write!(f, "{x:e}")
                } else {
                    write!(f, "{x}")
                }
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_exact_int() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.as_f64()),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
