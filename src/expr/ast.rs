//! Syntax tree for arithmetic expressions.
//!
//! The tree has exactly three node kinds. Anything else the input might
//! contain is rejected by the parser before a tree is built, so the
//! evaluator never sees it.

use super::number::Number;
use std::fmt;

/// Binding strength of the additive operators.
const PREC_ADDITIVE: u8 = 1;
/// Binding strength of the multiplicative operators.
const PREC_MULTIPLICATIVE: u8 = 2;
/// Binding strength of unary plus and minus.
const PREC_UNARY: u8 = 3;
/// Binding strength of exponentiation.
const PREC_POWER: u8 = 4;
/// Literals never need parentheses.
const PREC_ATOM: u8 = 5;

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` (true division)
    Div,
    /// `//` (floor division)
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Canonical ASCII symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }

    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => PREC_ADDITIVE,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => PREC_MULTIPLICATIVE,
            Self::Pow => PREC_POWER,
        }
    }
}

/// Unary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
}

impl UnaryOp {
    /// Canonical ASCII symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
        }
    }
}

/// An arithmetic expression tree.
///
/// `Display` prints the normalized form: ASCII operators, one space around
/// binary operators, and only the parentheses the grammar requires. The
/// alternate form (`{:#}`) drops the spaces. Parsing either text yields an
/// identical tree.
///
/// # Examples
///
/// ```
/// use talkcalc::expr::{BinaryOp, Expr};
///
/// let expr = Expr::binary(
///     BinaryOp::Mul,
///     Expr::binary(BinaryOp::Add, Expr::int(3), Expr::int(4)),
///     Expr::int(2),
/// );
/// assert_eq!(expr.to_string(), "(3 + 4) * 2");
/// assert_eq!(format!("{expr:#}"), "(3+4)*2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Literal(Number),
    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Self>,
    },
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
}

impl Expr {
    /// Integer literal.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::Literal(Number::Int(value))
    }

    /// Float literal.
    #[must_use]
    pub const fn float(value: f64) -> Self {
        Self::Literal(Number::Float(value))
    }

    /// Unary node.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Binary node.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Unary { operand, .. } => 1 + operand.node_count(),
            Self::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Literal(n) if n.is_negative() => PREC_UNARY,
            Self::Literal(_) => PREC_ATOM,
            Self::Unary { .. } => PREC_UNARY,
            Self::Binary { op, .. } => op.precedence(),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            f.write_str("(")?;
            fmt::Display::fmt(self, f)?;
            f.write_str(")")
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(n) => n.write_literal(f),
            Self::Unary { op, operand } => {
                f.write_str(op.symbol())?;
                operand.fmt_operand(f, operand.precedence() < PREC_UNARY)
            }
            Self::Binary { op, left, right } => {
                let prec = op.precedence();
                // `**` is right-associative and its left operand must be a primary.
                let (left_parens, right_parens) = if *op == BinaryOp::Pow {
                    (left.precedence() <= prec, right.precedence() < PREC_UNARY)
                } else {
                    (left.precedence() < prec, right.precedence() <= prec)
                };
                left.fmt_operand(f, left_parens)?;
                if f.alternate() {
                    f.write_str(op.symbol())?;
                } else {
                    write!(f, " {} ", op.symbol())?;
                }
                right.fmt_operand(f, right_parens)
            }
        }
    }
}
