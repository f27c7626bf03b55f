//! Tree-walking evaluation of [`Expr`] trees.
//!
//! Integer arithmetic stays exact while it fits in i64 and falls back to
//! floating point on overflow. Division and modulo follow floor semantics
//! (quotient rounded toward negative infinity, remainder takes the sign of
//! the divisor).

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::number::Number;
use crate::error::EvalError;

/// Evaluates `expr` depth-first, operands before operators.
///
/// # Errors
///
/// Returns [`EvalError::DivisionByZero`] or [`EvalError::Evaluation`].
pub fn eval(expr: &Expr, max_exponent: f64) -> Result<Number, EvalError> {
    match expr {
        Expr::Literal(n) => Ok(*n),
        Expr::Unary { op, operand } => {
            let value = eval(operand, max_exponent)?;
            Ok(apply_unary(*op, value))
        }
        Expr::Binary { op, left, right } => {
            let lhs = eval(left, max_exponent)?;
            let rhs = eval(right, max_exponent)?;
            apply_binary(*op, lhs, rhs, max_exponent)
        }
    }
}

fn apply_unary(op: UnaryOp, value: Number) -> Number {
    match (op, value) {
        (UnaryOp::Pos, v) => v,
        (UnaryOp::Neg, Number::Int(i)) => i
            .checked_neg()
            .map_or_else(|| Number::Float(-value.as_f64()), Number::Int),
        (UnaryOp::Neg, Number::Float(f)) => Number::Float(-f),
    }
}

fn apply_binary(
    op: BinaryOp,
    lhs: Number,
    rhs: Number,
    max_exponent: f64,
) -> Result<Number, EvalError> {
    match op {
        BinaryOp::Add => integral_or_float(lhs, rhs, i64::checked_add, |a, b| a + b),
        BinaryOp::Sub => integral_or_float(lhs, rhs, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => integral_or_float(lhs, rhs, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => {
            ensure_nonzero(rhs)?;
            finite(lhs.as_f64() / rhs.as_f64())
        }
        BinaryOp::FloorDiv => {
            ensure_nonzero(rhs)?;
            integral_or_float(lhs, rhs, floor_div_int, |a, b| (a / b).floor())
        }
        BinaryOp::Mod => {
            ensure_nonzero(rhs)?;
            integral_or_float(lhs, rhs, floor_mod_int, floor_mod_float)
        }
        BinaryOp::Pow => power(lhs, rhs, max_exponent),
    }
}

/// Applies the integer operation when both sides are integers and it does
/// not overflow, otherwise the float operation.
fn integral_or_float(
    lhs: Number,
    rhs: Number,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Number, EvalError> {
    if let (Number::Int(a), Number::Int(b)) = (lhs, rhs)
        && let Some(result) = int_op(a, b)
    {
        return Ok(Number::Int(result));
    }
    finite(float_op(lhs.as_f64(), rhs.as_f64()))
}

fn ensure_nonzero(divisor: Number) -> Result<(), EvalError> {
    if divisor.is_zero() {
        Err(EvalError::DivisionByZero)
    } else {
        Ok(())
    }
}

fn finite(value: f64) -> Result<Number, EvalError> {
    if value.is_nan() {
        Err(EvalError::evaluation("result is undefined"))
    } else if value.is_infinite() {
        Err(EvalError::evaluation("result magnitude too large"))
    } else {
        Ok(Number::Float(value))
    }
}

fn floor_div_int(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn floor_mod_int(a: i64, b: i64) -> Option<i64> {
    // i64::MIN % -1 overflows in hardware but is mathematically zero.
    let r = a.checked_rem(b).unwrap_or(0);
    if r != 0 && (r < 0) != (b < 0) {
        Some(r + b)
    } else {
        Some(r)
    }
}

fn floor_mod_float(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn power(base: Number, exponent: Number, max_exponent: f64) -> Result<Number, EvalError> {
    let exp = exponent.as_f64();
    if exp.abs() > max_exponent {
        return Err(EvalError::evaluation(format!(
            "exponent {exponent} exceeds limit of {max_exponent}"
        )));
    }

    if let (Number::Int(b), Number::Int(e)) = (base, exponent)
        && let Ok(e) = u32::try_from(e)
        && let Some(result) = b.checked_pow(e)
    {
        return Ok(Number::Int(result));
    }

    if base.is_zero() && exp < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base.is_negative() && !exponent.is_integral() {
        return Err(EvalError::evaluation(
            "negative base with fractional exponent has no real result",
        ));
    }
    finite(base.as_f64().powf(exp))
}
